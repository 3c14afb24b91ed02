//! Row Actions
//!
//! Hover reveal of per-row icons, edit-dialog population and the delete
//! confirmation flow. Event listeners are bound once by the app; this type
//! only holds the behaviour and the per-page state.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable, Aborted};

use super::records;
use crate::api::Backend;
use crate::dom::{input_named, is_plain_name, textarea_named, Page};
use crate::error::ApiError;
use crate::models::{field_text, DeleteResponse, HoverConfig, PendingDelete, RecordPayload, RowId, ROW_PREFIX};

pub const EDIT_MODAL: &str = "edit-modal";
pub const CONFIRM_DELETE: &str = "confirmDelete";
/// Confirm button inside the delete dialog
pub const DANGER_BUTTON: &str = ".btn-danger";
pub const EDIT_PREFIX: &str = "edit";
pub const DELETE_PREFIX: &str = "delete";

pub struct RowActions {
    config: HoverConfig,
    page: Rc<dyn Page>,
    backend: Rc<dyn Backend>,
    pending_delete: RefCell<Option<PendingDelete>>,
    inflight_fetch: RefCell<Option<AbortHandle>>,
}

impl RowActions {
    pub fn new(config: HoverConfig, page: Rc<dyn Page>, backend: Rc<dyn Backend>) -> Self {
        Self {
            config,
            page,
            backend,
            pending_delete: RefCell::new(None),
            inflight_fetch: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.pending_delete.borrow().clone()
    }

    fn row_id(element_id: &str) -> Option<RowId> {
        let id = RowId::from_element_id(element_id, ROW_PREFIX);
        if id.is_none() {
            log::warn!("[ROWS] element '{element_id}' has no {ROW_PREFIX} id, ignoring");
        }
        id
    }

    /// Pointer entered a row: reveal its icons.
    pub fn on_enter(&self, element_id: &str) -> Option<RowId> {
        let id = Self::row_id(element_id)?;
        for icon in self.config.icons.element_ids(&id) {
            self.page.reveal(&icon);
        }
        Some(id)
    }

    /// Pointer left a row: hide its icons if configured to.
    pub fn on_leave(&self, element_id: &str) {
        if !self.config.hide_on_leave {
            return;
        }
        if let Some(id) = Self::row_id(element_id) {
            for icon in self.config.icons.element_ids(&id) {
                self.page.conceal(&icon);
            }
        }
    }

    /// Abandon an edit fetch still in flight.
    pub fn cancel_fetch(&self) {
        if let Some(handle) = self.inflight_fetch.borrow_mut().take() {
            handle.abort();
        }
    }

    /// Edit trigger: load the record into the edit dialog.
    pub async fn on_edit(&self, id: RowId) -> Result<(), ApiError> {
        if !self.page.exists(EDIT_MODAL) {
            return Ok(());
        }
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.inflight_fetch.borrow_mut().replace(handle) {
            previous.abort();
        }

        let fetch = records::fetch_by_id(self.backend.as_ref(), &id);
        let payload = match Abortable::new(fetch, registration).await {
            Ok(result) => result?,
            Err(Aborted) => {
                log::debug!("[ROWS] fetch for {id} abandoned");
                return Err(ApiError::Aborted);
            }
        };
        self.populate(&id, &payload);
        Ok(())
    }

    fn populate(&self, id: &RowId, payload: &RecordPayload) {
        for (key, value) in payload {
            if !is_plain_name(key) {
                log::debug!("[ROWS] skipping field '{key}'");
                continue;
            }
            let text = field_text(value);
            if !self.page.set_value(EDIT_MODAL, &input_named(key), &text) {
                self.page.set_value(EDIT_MODAL, &textarea_named(key), &text);
            }
        }
        self.page.set_value(EDIT_MODAL, &input_named("id"), id.as_str());
    }

    /// Delete trigger: remember the target and label the confirm dialog.
    pub fn on_delete_intent(&self, id: RowId) {
        if !self.page.exists(EDIT_MODAL) {
            return;
        }
        self.cancel_fetch();
        let summary = self
            .page
            .parent_text(&id.element_id(DELETE_PREFIX))
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        self.page.set_data(CONFIRM_DELETE, "id", id.as_str());
        self.page.set_data(CONFIRM_DELETE, "summary", &summary);
        self.page
            .set_text_within(CONFIRM_DELETE, DANGER_BUTTON, &format!("Delete {summary}"));

        log::debug!("[ROWS] delete pending for {id}");
        *self.pending_delete.borrow_mut() = Some(PendingDelete { id, summary });
    }

    /// Confirm button: delete the pending target, if any.
    pub async fn on_confirm_delete(&self) -> Result<Option<DeleteResponse>, ApiError> {
        let Some(target) = self.pending_delete.borrow_mut().take() else {
            return Ok(None);
        };
        let response = records::delete_by_id(self.page.as_ref(), self.backend.as_ref(), &target.id).await?;
        Ok(Some(response))
    }
}
