//! Inline Slider Updater
//!
//! Saves a category slider's value as soon as it changes and confirms the
//! save after a short delay. A change that follows the previous one within
//! that delay takes over its confirmation; spaced changes each confirm.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::api::Backend;
use crate::config::{SaveIndicator, SliderConfig};
use crate::dom::Page;
use crate::error::ApiError;
use crate::models::{RowId, CATEGORY_PREFIX};
use crate::timer::{Debounce, Timer};

pub const SAVE_STATUS: &str = "save-status";
pub const UPDATE_BADGE_PREFIX: &str = "update";
pub const SAVING_TEXT: &str = "saving...";
pub const SAVED_TEXT: &str = "All changes saved.";
const SAVING_COLOR: &str = "#888";
const SAVED_COLOR: &str = "#333";

pub struct SliderUpdater {
    config: SliderConfig,
    page: Rc<dyn Page>,
    backend: Rc<dyn Backend>,
    timer: Rc<dyn Timer>,
    /// Confirmations keyed by change number
    confirmations: Debounce,
    last_change: Cell<u64>,
    /// Number and start time of the most recent change
    previous: Cell<Option<(u64, u64)>>,
    /// Changes awaiting their response; `true` once taken over
    in_flight: RefCell<BTreeMap<u64, bool>>,
}

impl SliderUpdater {
    pub fn new(config: SliderConfig, page: Rc<dyn Page>, backend: Rc<dyn Backend>, timer: Rc<dyn Timer>) -> Self {
        Self {
            config,
            page,
            backend,
            confirmations: Debounce::new(timer.clone()),
            timer,
            last_change: Cell::new(0),
            previous: Cell::new(None),
            in_flight: RefCell::new(BTreeMap::new()),
        }
    }

    /// Slider `element_id` now holds `value`.
    pub async fn on_change(&self, element_id: &str, value: &str) -> Result<(), ApiError> {
        let Some(id) = RowId::from_element_id(element_id, CATEGORY_PREFIX) else {
            log::warn!("[SLIDER] element '{element_id}' has no {CATEGORY_PREFIX} id, ignoring");
            return Ok(());
        };
        let change = self.begin_change();

        self.page.set_status(SAVE_STATUS, SAVING_TEXT, SAVING_COLOR);
        let result = match self.page.csrf_token() {
            Some(token) => self.backend.update_value(&token, &id, value).await,
            None => Err(ApiError::MissingCsrfToken),
        };
        let superseded = self.in_flight.borrow_mut().remove(&change).unwrap_or(false);
        result?;

        if superseded {
            log::debug!("[SLIDER] save of {id} superseded");
            return Ok(());
        }
        let page = self.page.clone();
        let indicator = self.config.indicator;
        let element_id = element_id.to_string();
        self.confirmations.arm(
            change,
            self.config.save_delay_ms,
            Box::new(move || confirm_saved(page.as_ref(), indicator, &element_id, &id)),
        );
        Ok(())
    }

    /// Number a new change; a quick follow-up cancels the previous
    /// change's confirmation.
    fn begin_change(&self) -> u64 {
        let change = self.last_change.get() + 1;
        self.last_change.set(change);
        let now = self.timer.now_ms();

        if let Some((previous, started)) = self.previous.replace(Some((change, now))) {
            if now.saturating_sub(started) <= u64::from(self.config.save_delay_ms) {
                self.confirmations.cancel(previous);
                if let Some(taken_over) = self.in_flight.borrow_mut().get_mut(&previous) {
                    *taken_over = true;
                }
            }
        }
        self.in_flight.borrow_mut().insert(change, false);
        change
    }
}

fn confirm_saved(page: &dyn Page, indicator: SaveIndicator, element_id: &str, id: &RowId) {
    match indicator {
        SaveIndicator::Flash => page.flash_row(element_id),
        SaveIndicator::Badge => page.pulse(&id.element_id(UPDATE_BADGE_PREFIX)),
    }
    page.set_status(SAVE_STATUS, SAVED_TEXT, SAVED_COLOR);
    log::debug!("[SLIDER] {id} saved");
}
