//! RealEstate Page App
//!
//! Builds the controllers for the current page and binds them to the
//! document. Every listener is bound exactly once, at mount.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::api::{Backend, HttpBackend};
use crate::components::AlertBanner;
use crate::config::PageConfig;
use crate::controllers::{
    LoginController, RowActions, SliderUpdater, CONFIRM_DELETE, DANGER_BUTTON, DELETE_PREFIX, EDIT_MODAL,
    EDIT_PREFIX, LOGIN_FORM, LOGIN_MODAL,
};
use crate::dom::{Page, WebPage};
use crate::error::ApiError;
use crate::models::{RowId, CATEGORY_PREFIX};
use crate::timer::{GlooTimer, Timer};

/// Mount the app into the configured banner host, or the body.
pub fn mount(config: PageConfig) {
    let host = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(&config.banner_host))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    match host {
        Some(host) => leptos::mount::mount_to(host, move || view! { <App config=config /> }).forget(),
        None => leptos::mount::mount_to_body(move || view! { <App config=config /> }),
    }
}

#[component]
pub fn App(config: PageConfig) -> impl IntoView {
    let banner = RwSignal::new(None::<String>);

    match WebPage::new(config.hover.row_class.clone(), banner) {
        Some(page) => bind_page(&config, Rc::new(page)),
        None => log::error!("[APP] no document, page enhancements disabled"),
    }

    view! { <AlertBanner banner=banner /> }
}

/// Record endpoint from config, else the current path
fn record_endpoint(config: &PageConfig) -> String {
    config
        .endpoint
        .clone()
        .or_else(|| web_sys::window()?.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn bind_page(config: &PageConfig, page: Rc<WebPage>) {
    let page: Rc<dyn Page> = page;
    let endpoint = record_endpoint(config);
    log::info!(
        "[APP] {} rows .{} against {endpoint}",
        config.hover.kind.as_deref().unwrap_or("record"),
        config.hover.row_class
    );
    if config.hover.icons.is_empty() {
        log::warn!("[APP] no row icons configured, hover reveals nothing");
    }
    let backend: Rc<dyn Backend> = Rc::new(HttpBackend::new(endpoint, config.login_url.clone()));
    let timer: Rc<dyn Timer> = Rc::new(GlooTimer);

    bind_rows(Rc::new(RowActions::new(config.hover.clone(), page.clone(), backend.clone())));
    bind_sliders(Rc::new(SliderUpdater::new(
        config.slider.clone(),
        page.clone(),
        backend.clone(),
        timer,
    )));
    if page.exists(LOGIN_FORM) {
        bind_login(Rc::new(LoginController::new(config.login.clone(), page, backend)));
    }
}

/// Rows left and entered when the hovered row changes from `previous` to
/// `current`
fn hover_transition<'a>(previous: Option<&'a str>, current: Option<&'a str>) -> (Option<&'a str>, Option<&'a str>) {
    if previous == current {
        (None, None)
    } else {
        (previous, current)
    }
}

fn bind_rows(rows: Rc<RowActions>) {
    let hover = leptos_hover::create_hover_signals();
    leptos_hover::bind_global_hover(hover, &rows.config().row_class);

    let tracked = rows.clone();
    Effect::new(move |previous: Option<Option<String>>| {
        let current = hover.hovered_read.get();
        let previous = previous.flatten();
        let (left, entered) = hover_transition(previous.as_deref(), current.as_deref());
        if let Some(left) = left {
            tracked.on_leave(left);
        }
        if let Some(entered) = entered {
            tracked.on_enter(entered);
        }
        current
    });

    let clicks = rows.clone();
    leptos_hover::bind_delegated_click(
        vec![EDIT_PREFIX.to_string(), DELETE_PREFIX.to_string()],
        move |prefix, id, _| {
            let id = RowId::new(id);
            if prefix == DELETE_PREFIX {
                clicks.on_delete_intent(id);
                return;
            }
            let rows = clicks.clone();
            spawn_local(async move {
                match rows.on_edit(id).await {
                    Ok(()) | Err(ApiError::Aborted) => {}
                    Err(err) => log::warn!("[ROWS] edit failed: {err}"),
                }
            });
        },
    );

    let confirm = rows.clone();
    leptos_hover::bind_selector_click(&format!("#{CONFIRM_DELETE} {DANGER_BUTTON}"), move |_, _| {
        let rows = confirm.clone();
        spawn_local(async move {
            if let Err(err) = rows.on_confirm_delete().await {
                log::warn!("[ROWS] delete failed: {err}");
            }
        });
    });

    leptos_hover::bind_element_event(EDIT_MODAL, "hidden.bs.modal", move |_| rows.cancel_fetch());
}

fn slider_value(el: &web_sys::Element) -> Option<String> {
    el.dyn_ref::<web_sys::HtmlInputElement>()
        .map(web_sys::HtmlInputElement::value)
        .or_else(|| el.get_attribute("value"))
}

fn bind_sliders(slider: Rc<SliderUpdater>) {
    leptos_hover::bind_delegated_change(CATEGORY_PREFIX, move |el, _| {
        let Some(value) = slider_value(el) else {
            return;
        };
        let element_id = el.id();
        let slider = slider.clone();
        spawn_local(async move {
            if let Err(err) = slider.on_change(&element_id, &value).await {
                log::warn!("[SLIDER] save failed: {err}");
            }
        });
    });
}

fn bind_login(login: Rc<LoginController>) {
    let submitter = login.clone();
    leptos_hover::bind_element_event(LOGIN_FORM, "submit", move |ev| {
        ev.prevent_default();
        let login = submitter.clone();
        spawn_local(async move {
            let outcome = login.submit().await;
            log::debug!("[LOGIN] submit finished: {outcome:?}");
        });
    });

    let showing = login.clone();
    leptos_hover::bind_element_event(LOGIN_MODAL, "show.bs.modal", move |_| showing.on_modal_show());
    let shown = login.clone();
    leptos_hover::bind_element_event(LOGIN_MODAL, "shown.bs.modal", move |_| shown.on_modal_shown());
    leptos_hover::bind_element_event(LOGIN_MODAL, "hidden.bs.modal", move |_| login.on_modal_hidden());
}
