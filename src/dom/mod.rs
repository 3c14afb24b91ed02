//! Page Access
//!
//! Everything the controllers do to the document goes through [`Page`].
//! Elements are addressed by id, or by a selector inside an element found by
//! id. Missing elements are no-ops, never errors.

mod web;

pub use web::WebPage;

/// Duration of the hover reveal
pub const REVEAL_MS: u32 = 600;
/// Duration of the hover conceal
pub const CONCEAL_MS: u32 = 200;
/// Fade-out of the "updated" badge
pub const BADGE_FADE_MS: u32 = 2000;
/// Length of the row flash animation
pub const FLASH_MS: u32 = 1200;

/// Selector for the password input of a form
pub const PASSWORD_INPUT: &str = "input[type='password']";

pub fn input_named(name: &str) -> String {
    format!("input[name='{name}']")
}

pub fn textarea_named(name: &str) -> String {
    format!("textarea[name='{name}']")
}

/// Field names that are safe to splice into a selector
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// DOM operations used by the page controllers
pub trait Page {
    fn exists(&self, element_id: &str) -> bool;

    /// Fade an element in
    fn reveal(&self, element_id: &str);

    /// Fade an element out
    fn conceal(&self, element_id: &str);

    fn remove(&self, element_id: &str);

    /// Text content of the element's parent
    fn parent_text(&self, element_id: &str) -> Option<String>;

    /// Set text and inline colour in one go
    fn set_status(&self, element_id: &str, text: &str, color: &str);

    /// Set a `data-<key>` attribute
    fn set_data(&self, element_id: &str, key: &str, value: &str);

    /// Set the text of the first `selector` match inside the element
    fn set_text_within(&self, container_id: &str, selector: &str, text: &str);

    /// Set the value of the first `selector` match inside the element.
    /// Returns `false` when nothing matched.
    fn set_value(&self, container_id: &str, selector: &str, value: &str) -> bool;

    fn value(&self, container_id: &str, selector: &str) -> Option<String>;

    fn focus(&self, container_id: &str, selector: &str);

    fn add_class(&self, element_id: &str, class: &str);

    fn remove_class(&self, element_id: &str, class: &str);

    /// Replace the element's classes and text
    fn show_feedback(&self, element_id: &str, class: &str, text: &str);

    /// Drop the element's classes and empty it
    fn clear_feedback(&self, element_id: &str);

    /// Value of the first `csrfmiddlewaretoken` field on the page
    fn csrf_token(&self) -> Option<String>;

    /// Successful controls of a form as name/value pairs, in document order
    fn form_fields(&self, form_id: &str) -> Vec<(String, String)>;

    /// Full-page navigation
    fn navigate(&self, location: &str);

    /// Dismiss existing alerts and show a new dismissable one
    fn show_banner(&self, message: &str);

    /// Flash the listing row that contains the element
    fn flash_row(&self, element_id: &str);

    /// Show the element at once, then fade it out
    fn pulse(&self, element_id: &str);
}
