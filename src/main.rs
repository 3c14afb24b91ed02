//! RealEstate Page Enhancements Entry Point

mod api;
mod app;
mod components;
mod config;
mod controllers;
mod dom;
mod error;
mod models;
mod timer;

#[cfg(test)]
mod testing;

use config::PageConfig;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = PageConfig::load();
    if console_log::init_with_level(config.level()).is_err() {
        web_sys::console::warn_1(&"[APP] logger already initialised".into());
    }
    if let Some(err) = config_error {
        log::warn!("[APP] {err}, using default config");
    }

    app::mount(config);
}
