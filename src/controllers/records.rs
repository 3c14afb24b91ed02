//! Record Data Bridge
//!
//! Fetch and delete by id against the record endpoint.

use crate::api::Backend;
use crate::dom::Page;
use crate::error::ApiError;
use crate::models::{DeleteResponse, RecordPayload, RowId};

/// Id prefix of the list item removed after a delete
pub const LIST_ITEM_PREFIX: &str = "li";

pub fn deleted_message(name: &str) -> String {
    format!("Successfully deleted '{name}'")
}

pub async fn fetch_by_id(backend: &dyn Backend, id: &RowId) -> Result<RecordPayload, ApiError> {
    let payload = backend.fetch_record(id).await?;
    log::debug!("[API] record {} has {} fields", id, payload.len());
    Ok(payload)
}

/// Delete a record, then drop its list item and announce it.
pub async fn delete_by_id(page: &dyn Page, backend: &dyn Backend, id: &RowId) -> Result<DeleteResponse, ApiError> {
    let token = page.csrf_token().ok_or(ApiError::MissingCsrfToken)?;
    let response = backend.delete_record(&token, id).await?;

    page.remove(&format!("{LIST_ITEM_PREFIX}_{}", response.id));
    if let Some(name) = response.name.as_deref().filter(|name| !name.is_empty()) {
        page.show_banner(&deleted_message(name));
    }
    log::info!("[API] deleted record {}", response.id);
    Ok(response)
}
