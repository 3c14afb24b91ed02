//! Page Controllers
//!
//! Behaviour behind each enhanced part of the page. Controllers only talk to
//! the document through [`Page`](crate::dom::Page) and to the server through
//! [`Backend`](crate::api::Backend).

mod login;
mod records;
mod row_actions;
mod slider;

pub use login::{LoginController, LOGIN_FORM, LOGIN_MODAL};
pub use row_actions::{RowActions, CONFIRM_DELETE, DANGER_BUTTON, DELETE_PREFIX, EDIT_MODAL, EDIT_PREFIX};
pub use slider::SliderUpdater;
