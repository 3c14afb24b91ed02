//! UI Components
//!
//! Leptos views injected into the server-rendered page.

mod alert_banner;

pub use alert_banner::AlertBanner;
