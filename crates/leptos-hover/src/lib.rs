//! Leptos Hover Utilities
//!
//! Row hover tracking and delegated event binding for server-rendered markup.
//! Every listener is bound once on the document, so rows added or re-rendered
//! later are covered without rebinding.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Hover state signals
#[derive(Clone, Copy)]
pub struct HoverSignals {
    /// Element id of the row under the pointer
    pub hovered_read: ReadSignal<Option<String>>,
    pub hovered_write: WriteSignal<Option<String>>,
}

/// Class toggled on an element while it flashes
pub const FLASH_CLASS: &str = "row-flash";

pub fn create_hover_signals() -> HoverSignals {
    let (hovered_read, hovered_write) = signal(None::<String>);
    HoverSignals {
        hovered_read,
        hovered_write,
    }
}

/// Strip `prefix` from an element id, ignoring ASCII case.
///
/// Returns `None` when the prefix is missing or nothing follows it.
pub fn id_suffix<'a>(element_id: &'a str, prefix: &str) -> Option<&'a str> {
    let head = element_id.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let rest = &element_id[prefix.len()..];
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|win| win.document())
}

fn event_element(ev: &web_sys::Event) -> Option<web_sys::Element> {
    ev.target()?.dyn_into::<web_sys::Element>().ok()
}

fn listen(event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if let Some(doc) = document() {
        let _ = doc.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    }
    cb.forget();
}

/// Track which element of `row_class` the pointer is over.
///
/// Moving between children of the same row does not reset the signal.
pub fn bind_global_hover(hover: HoverSignals, row_class: &str) {
    let selector = format!(".{row_class}");

    let over_selector = selector.clone();
    listen("mouseover", move |ev: web_sys::Event| {
        let row = event_element(&ev).and_then(|el| el.closest(&over_selector).ok().flatten());
        if let Some(row) = row {
            let id = row.id();
            if hover.hovered_read.get_untracked().as_deref() != Some(id.as_str()) {
                hover.hovered_write.set(Some(id));
            }
        }
    });

    listen("mouseout", move |ev: web_sys::Event| {
        let Some(ev) = ev.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let Some(row) = event_element(ev).and_then(|el| el.closest(&selector).ok().flatten()) else {
            return;
        };
        // Still inside the same row
        let related = ev
            .related_target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        if related.as_ref().is_some_and(|node| row.contains(Some(node))) {
            return;
        }
        if hover.hovered_read.get_untracked().as_deref() == Some(row.id().as_str()) {
            hover.hovered_write.set(None);
        }
    });
}

/// Bind one document-level click listener for elements whose id starts with
/// any of `prefixes`. The handler receives the matched prefix and the id
/// suffix.
pub fn bind_delegated_click<F>(prefixes: Vec<String>, on_click: F)
where
    F: Fn(&str, &str, &web_sys::MouseEvent) + 'static,
{
    let selector = prefixes
        .iter()
        .map(|p| format!("[id^='{p}_']"))
        .collect::<Vec<_>>()
        .join(", ");

    listen("click", move |ev: web_sys::Event| {
        let Some(ev) = ev.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let Some(el) = event_element(ev).and_then(|el| el.closest(&selector).ok().flatten()) else {
            return;
        };
        let element_id = el.id();
        for prefix in &prefixes {
            if let Some(suffix) = id_suffix(&element_id, &format!("{prefix}_")) {
                on_click(prefix, suffix, ev);
                return;
            }
        }
    });
}

/// Bind one document-level click listener for elements matching `selector`.
pub fn bind_selector_click<F>(selector: &str, on_click: F)
where
    F: Fn(&web_sys::Element, &web_sys::MouseEvent) + 'static,
{
    let selector = selector.to_string();
    listen("click", move |ev: web_sys::Event| {
        let Some(ev) = ev.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        if let Some(el) = event_element(ev).and_then(|el| el.closest(&selector).ok().flatten()) {
            on_click(&el, ev);
        }
    });
}

/// Bind one document-level `change` listener for elements whose id starts
/// with `prefix`.
pub fn bind_delegated_change<F>(prefix: &str, on_change: F)
where
    F: Fn(&web_sys::Element, &str) + 'static,
{
    let prefix = prefix.to_string();
    listen("change", move |ev: web_sys::Event| {
        let Some(el) = event_element(&ev) else {
            return;
        };
        let element_id = el.id();
        if let Some(suffix) = id_suffix(&element_id, &prefix) {
            on_change(&el, suffix);
        }
    });
}

/// Bind a listener for a named event on one element, if present.
pub fn bind_element_event<F>(element_id: &str, event: &str, handler: F) -> bool
where
    F: FnMut(web_sys::Event) + 'static,
{
    let Some(el) = document().and_then(|doc| doc.get_element_by_id(element_id)) else {
        return false;
    };
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    let bound = el
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .is_ok();
    cb.forget();
    bound
}

// ========================
// Effects
// ========================

/// Bump the element's fade generation so older pending fades stand down.
fn next_fade_generation(el: &web_sys::HtmlElement) -> String {
    let next = el
        .get_attribute("data-fade-gen")
        .and_then(|g| g.parse::<u32>().ok())
        .unwrap_or(0)
        .wrapping_add(1)
        .to_string();
    let _ = el.set_attribute("data-fade-gen", &next);
    next
}

fn is_display_none(el: &web_sys::HtmlElement) -> bool {
    web_sys::window()
        .and_then(|win| win.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value("display").ok())
        .is_some_and(|display| display == "none")
}

/// Whether a fade-in would change anything.
///
/// `inline_opacity` is the element's own style value, `computed_opacity` the
/// resolved one. An inline `0` means hidden or fading out.
pub fn needs_fade_in(display_none: bool, inline_opacity: &str, computed_opacity: &str) -> bool {
    if display_none {
        return true;
    }
    match inline_opacity.trim() {
        "" => computed_opacity.trim().parse::<f32>().map_or(true, |o| o < 1.0),
        inline => inline != "1",
    }
}

/// Fade an element in over `duration_ms`. An element already shown is left
/// alone.
pub fn fade_in(el: &web_sys::HtmlElement, duration_ms: u32) {
    let inline_opacity = el.style().get_property_value("opacity").unwrap_or_default();
    let computed_opacity = web_sys::window()
        .and_then(|win| win.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value("opacity").ok())
        .unwrap_or_default();
    if !needs_fade_in(is_display_none(el), &inline_opacity, &computed_opacity) {
        return;
    }
    next_fade_generation(el);
    let style = el.style();
    let _ = style.set_property("transition", &format!("opacity {duration_ms}ms"));
    let _ = style.set_property("opacity", "0");
    let _ = style.remove_property("display");
    if is_display_none(el) {
        let _ = style.set_property("display", "inline-block");
    }
    let el = el.clone();
    gloo_timers::callback::Timeout::new(0, move || {
        let _ = el.style().set_property("opacity", "1");
    })
    .forget();
}

/// Fade an element out over `duration_ms`, then hide it.
pub fn fade_out(el: &web_sys::HtmlElement, duration_ms: u32) {
    let generation = next_fade_generation(el);
    let style = el.style();
    let _ = style.set_property("transition", &format!("opacity {duration_ms}ms"));
    let _ = style.set_property("opacity", "0");
    let el = el.clone();
    gloo_timers::callback::Timeout::new(duration_ms, move || {
        if el.get_attribute("data-fade-gen").as_deref() == Some(generation.as_str()) {
            let _ = el.style().set_property("display", "none");
        }
    })
    .forget();
}

/// Show an element immediately, then fade it out.
pub fn show_then_fade(el: &web_sys::HtmlElement, duration_ms: u32) {
    next_fade_generation(el);
    let style = el.style();
    let _ = style.set_property("transition", "none");
    let _ = style.set_property("opacity", "1");
    let _ = style.remove_property("display");
    if is_display_none(el) {
        let _ = style.set_property("display", "inline-block");
    }
    let el = el.clone();
    gloo_timers::callback::Timeout::new(0, move || fade_out(&el, duration_ms)).forget();
}

/// Highlight an element with [`FLASH_CLASS`] for `duration_ms`.
pub fn flash(el: &web_sys::Element, duration_ms: u32) {
    let classes = el.class_list();
    // Restart the animation if it is already running
    let _ = classes.remove_1(FLASH_CLASS);
    let _ = classes.add_1(FLASH_CLASS);
    let el = el.clone();
    gloo_timers::callback::Timeout::new(duration_ms, move || {
        let _ = el.class_list().remove_1(FLASH_CLASS);
    })
    .forget();
}
