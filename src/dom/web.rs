//! Browser Page
//!
//! [`Page`] over the live document via `web-sys`.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use super::{Page, BADGE_FADE_MS, CONCEAL_MS, FLASH_MS, REVEAL_MS};
use crate::api::CSRF_FIELD;

/// Alerts removed before a new banner is shown; ours carries `data-banner`
const STALE_ALERTS: &str = ".alert-dismissable:not([data-banner]), .alert-dismissible:not([data-banner])";

/// The live document
#[derive(Clone)]
pub struct WebPage {
    document: Document,
    row_class: String,
    banner: RwSignal<Option<String>>,
}

impl WebPage {
    /// `None` outside a browser window
    pub fn new(row_class: impl Into<String>, banner: RwSignal<Option<String>>) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            row_class: row_class.into(),
            banner,
        })
    }

    fn element(&self, element_id: &str) -> Option<Element> {
        self.document.get_element_by_id(element_id)
    }

    fn html_element(&self, element_id: &str) -> Option<HtmlElement> {
        self.element(element_id)?.dyn_into::<HtmlElement>().ok()
    }

    fn within(&self, container_id: &str, selector: &str) -> Option<Element> {
        self.element(container_id)?.query_selector(selector).ok().flatten()
    }
}

fn control_value(el: &Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        Some(area.value())
    } else {
        el.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
    }
}

/// Name/value of a control the way a form submission would include it
fn successful_control(el: &Element) -> Option<(String, String)> {
    let name = el.get_attribute("name").filter(|n| !n.is_empty())?;
    if el.has_attribute("disabled") {
        return None;
    }
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        match input.type_().to_ascii_lowercase().as_str() {
            "submit" | "button" | "image" | "reset" | "file" => return None,
            "checkbox" | "radio" if !input.checked() => return None,
            _ => {}
        }
    }
    Some((name, control_value(el)?))
}

impl Page for WebPage {
    fn exists(&self, element_id: &str) -> bool {
        self.element(element_id).is_some()
    }

    fn reveal(&self, element_id: &str) {
        if let Some(el) = self.html_element(element_id) {
            leptos_hover::fade_in(&el, REVEAL_MS);
        }
    }

    fn conceal(&self, element_id: &str) {
        if let Some(el) = self.html_element(element_id) {
            leptos_hover::fade_out(&el, CONCEAL_MS);
        }
    }

    fn remove(&self, element_id: &str) {
        if let Some(el) = self.element(element_id) {
            el.remove();
        }
    }

    fn parent_text(&self, element_id: &str) -> Option<String> {
        self.element(element_id)?.parent_element()?.text_content()
    }

    fn set_status(&self, element_id: &str, text: &str, color: &str) {
        if let Some(el) = self.html_element(element_id) {
            el.set_text_content(Some(text));
            let _ = el.style().set_property("color", color);
            let _ = el.style().remove_property("display");
        }
    }

    fn set_data(&self, element_id: &str, key: &str, value: &str) {
        if let Some(el) = self.element(element_id) {
            let _ = el.set_attribute(&format!("data-{key}"), value);
        }
    }

    fn set_text_within(&self, container_id: &str, selector: &str, text: &str) {
        if let Some(el) = self.within(container_id, selector) {
            el.set_text_content(Some(text));
        }
    }

    fn set_value(&self, container_id: &str, selector: &str, value: &str) -> bool {
        let Some(el) = self.within(container_id, selector) else {
            return false;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            return false;
        }
        true
    }

    fn value(&self, container_id: &str, selector: &str) -> Option<String> {
        control_value(&self.within(container_id, selector)?)
    }

    fn focus(&self, container_id: &str, selector: &str) {
        if let Some(el) = self
            .within(container_id, selector)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.focus();
        }
    }

    fn add_class(&self, element_id: &str, class: &str) {
        if let Some(el) = self.element(element_id) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&self, element_id: &str, class: &str) {
        if let Some(el) = self.element(element_id) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn show_feedback(&self, element_id: &str, class: &str, text: &str) {
        if let Some(el) = self.element(element_id) {
            el.set_class_name(class);
            el.set_text_content(Some(text));
        }
    }

    fn clear_feedback(&self, element_id: &str) {
        if let Some(el) = self.element(element_id) {
            el.set_class_name("");
            el.set_text_content(None);
        }
    }

    fn csrf_token(&self) -> Option<String> {
        let fields = self.document.get_elements_by_name(CSRF_FIELD);
        (0..fields.length())
            .filter_map(|i| fields.item(i))
            .find_map(|node| node.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn form_fields(&self, form_id: &str) -> Vec<(String, String)> {
        let Some(controls) = self
            .element(form_id)
            .and_then(|form| form.query_selector_all("input, select, textarea").ok())
        else {
            return Vec::new();
        };
        (0..controls.length())
            .filter_map(|i| controls.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| successful_control(&el))
            .collect()
    }

    fn navigate(&self, location: &str) {
        if let Some(loc) = self.document.location() {
            if let Err(err) = loc.set_href(location) {
                log::error!("[APP] navigation to {location} failed: {err:?}");
            }
        }
    }

    fn show_banner(&self, message: &str) {
        if let Ok(stale) = self.document.query_selector_all(STALE_ALERTS) {
            (0..stale.length())
                .filter_map(|i| stale.item(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .for_each(|el| el.remove());
        }
        self.banner.set(Some(message.to_string()));
    }

    fn flash_row(&self, element_id: &str) {
        let Some(el) = self.element(element_id) else {
            return;
        };
        let row_selector = format!(".{}, tr, li", self.row_class);
        let row = el
            .closest(&row_selector)
            .ok()
            .flatten()
            .or_else(|| el.parent_element());
        if let Some(row) = row {
            leptos_hover::flash(&row, FLASH_MS);
        }
    }

    fn pulse(&self, element_id: &str) {
        if let Some(el) = self.html_element(element_id) {
            leptos_hover::show_then_fade(&el, BADGE_FADE_MS);
        }
    }
}
