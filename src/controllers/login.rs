//! Login Form Controller
//!
//! AJAX submit of the login form and the login modal's focus handling.
//! One submission is in flight at a time; submits while one is pending are
//! dropped.

use std::cell::Cell;
use std::rc::Rc;

use crate::api::{with_csrf, Backend};
use crate::config::LoginConfig;
use crate::dom::{input_named, Page, PASSWORD_INPUT};
use crate::models::LoginResponse;

pub const LOGIN_FORM: &str = "login-form";
pub const LOGIN_FEEDBACK: &str = "login-feedback";
pub const LOGIN_MODAL: &str = "modal-login";
pub const MAIN_CONTENT: &str = "main-content";

pub const LOADING_CLASS: &str = "loading";
pub const ERROR_CLASS: &str = "alert alert-danger";
pub const MODAL_ACTIVE_CLASS: &str = "modal-active";

pub const LOGIN_FAILED: &str = "Login Failed";
pub const SERVER_ERROR: &str = "Server Error";

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    Idle,
    Submitting,
}

/// What a submit attempt ended with
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Another submission was still pending
    Ignored,
    /// Browser sent to this location
    Redirected(String),
    /// Server said `success: false`
    Rejected,
    /// Request failed or the answer was unreadable
    ServerError,
}

pub struct LoginController {
    config: LoginConfig,
    page: Rc<dyn Page>,
    backend: Rc<dyn Backend>,
    phase: Cell<LoginPhase>,
}

impl LoginController {
    pub fn new(config: LoginConfig, page: Rc<dyn Page>, backend: Rc<dyn Backend>) -> Self {
        Self {
            config,
            page,
            backend,
            phase: Cell::new(LoginPhase::Idle),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> LoginPhase {
        self.phase.get()
    }

    pub async fn submit(&self) -> LoginOutcome {
        if self.phase.get() == LoginPhase::Submitting {
            log::debug!("[LOGIN] submit ignored, request pending");
            return LoginOutcome::Ignored;
        }
        self.phase.set(LoginPhase::Submitting);
        self.page.add_class(LOGIN_FORM, LOADING_CLASS);
        self.page.clear_feedback(LOGIN_FEEDBACK);

        let fields = with_csrf(self.page.form_fields(LOGIN_FORM), self.page.csrf_token().as_deref());
        match self.backend.login(&fields).await {
            Ok(LoginResponse { success: true, location }) => {
                let target = location.filter(|l| !l.is_empty()).unwrap_or_else(|| "/".to_string());
                log::info!("[LOGIN] signed in, redirecting to {target}");
                // The page unloads, so the form stays in its submitting state
                self.page.navigate(&target);
                LoginOutcome::Redirected(target)
            }
            Ok(_) => {
                log::info!("[LOGIN] credentials rejected");
                self.fail(LOGIN_FAILED);
                LoginOutcome::Rejected
            }
            Err(err) => {
                log::warn!("[LOGIN] {err}");
                self.fail(SERVER_ERROR);
                LoginOutcome::ServerError
            }
        }
    }

    fn fail(&self, message: &str) {
        self.phase.set(LoginPhase::Idle);
        self.page.remove_class(LOGIN_FORM, LOADING_CLASS);
        self.page.show_feedback(LOGIN_FEEDBACK, ERROR_CLASS, message);
        self.page.set_value(LOGIN_FORM, PASSWORD_INPUT, "");
        self.page.focus(LOGIN_FORM, PASSWORD_INPUT);
    }

    // ========================
    // Modal Lifecycle
    // ========================

    pub fn on_modal_show(&self) {
        self.page.add_class(MAIN_CONTENT, MODAL_ACTIVE_CLASS);
    }

    /// Focus the email field while it is empty, the password otherwise
    pub fn on_modal_shown(&self) {
        let email = input_named(&self.config.email_field);
        match self.page.value(LOGIN_FORM, &email) {
            Some(value) if !value.is_empty() => self.page.focus(LOGIN_FORM, PASSWORD_INPUT),
            _ => self.page.focus(LOGIN_FORM, &email),
        }
    }

    pub fn on_modal_hidden(&self) {
        self.page.clear_feedback(LOGIN_FEEDBACK);
        self.page.remove_class(MAIN_CONTENT, MODAL_ACTIVE_CLASS);
    }
}
