//! Test Doubles
//!
//! In-memory stand-ins for the page, the server and the clock.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::api::Backend;
use crate::dom::Page;
use crate::error::ApiError;
use crate::models::{DeleteResponse, LoginResponse, RecordPayload, RowId};
use crate::timer::{Timer, TimerGuard};

// ========================
// Page
// ========================

#[derive(Default)]
pub struct FakePage {
    pub elements: RefCell<BTreeSet<String>>,
    pub visible: RefCell<BTreeSet<String>>,
    pub removed: RefCell<Vec<String>>,
    pub parent_texts: RefCell<HashMap<String, String>>,
    pub texts: RefCell<HashMap<String, String>>,
    pub colors: RefCell<HashMap<String, String>>,
    pub data: RefCell<HashMap<(String, String), String>>,
    pub texts_within: RefCell<HashMap<(String, String), String>>,
    pub fields: RefCell<HashMap<(String, String), String>>,
    pub focused: RefCell<Option<(String, String)>>,
    pub classes: RefCell<HashMap<String, BTreeSet<String>>>,
    pub csrf: RefCell<Option<String>>,
    pub forms: RefCell<HashMap<String, Vec<(String, String)>>>,
    pub navigations: RefCell<Vec<String>>,
    pub banners: RefCell<Vec<String>>,
    pub flashed: RefCell<Vec<String>>,
    pub pulsed: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn with_elements<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements.borrow_mut().extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_field(self, container: &str, selector: &str, value: &str) -> Self {
        self.fields
            .borrow_mut()
            .insert((container.to_string(), selector.to_string()), value.to_string());
        self
    }

    pub fn with_parent_text(self, element_id: &str, text: &str) -> Self {
        self.parent_texts
            .borrow_mut()
            .insert(element_id.to_string(), text.to_string());
        self
    }

    pub fn with_csrf(self, token: &str) -> Self {
        *self.csrf.borrow_mut() = Some(token.to_string());
        self
    }

    pub fn with_form(self, form_id: &str, fields: &[(&str, &str)]) -> Self {
        self.forms.borrow_mut().insert(
            form_id.to_string(),
            fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        );
        self
    }

    fn put_text(&self, element_id: &str, text: &str) {
        self.texts
            .borrow_mut()
            .insert(element_id.to_string(), text.to_string());
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.visible.borrow().iter().cloned().collect()
    }

    pub fn field(&self, container: &str, selector: &str) -> Option<String> {
        self.fields
            .borrow()
            .get(&(container.to_string(), selector.to_string()))
            .cloned()
    }

    pub fn text(&self, element_id: &str) -> Option<String> {
        self.texts.borrow().get(element_id).cloned()
    }

    pub fn has_class(&self, element_id: &str, class: &str) -> bool {
        self.classes
            .borrow()
            .get(element_id)
            .is_some_and(|set| set.contains(class))
    }

    pub fn class_string(&self, element_id: &str) -> String {
        self.classes
            .borrow()
            .get(element_id)
            .map(|set| set.iter().cloned().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    pub fn data_attr(&self, element_id: &str, key: &str) -> Option<String> {
        self.data
            .borrow()
            .get(&(element_id.to_string(), key.to_string()))
            .cloned()
    }
}

impl Page for FakePage {
    fn exists(&self, element_id: &str) -> bool {
        self.elements.borrow().contains(element_id)
    }

    fn reveal(&self, element_id: &str) {
        if self.exists(element_id) {
            self.visible.borrow_mut().insert(element_id.to_string());
        }
    }

    fn conceal(&self, element_id: &str) {
        self.visible.borrow_mut().remove(element_id);
    }

    fn remove(&self, element_id: &str) {
        if self.elements.borrow_mut().remove(element_id) {
            self.removed.borrow_mut().push(element_id.to_string());
        }
    }

    fn parent_text(&self, element_id: &str) -> Option<String> {
        self.parent_texts.borrow().get(element_id).cloned()
    }

    fn set_status(&self, element_id: &str, text: &str, color: &str) {
        self.put_text(element_id, text);
        self.colors
            .borrow_mut()
            .insert(element_id.to_string(), color.to_string());
    }

    fn set_data(&self, element_id: &str, key: &str, value: &str) {
        self.data
            .borrow_mut()
            .insert((element_id.to_string(), key.to_string()), value.to_string());
    }

    fn set_text_within(&self, container_id: &str, selector: &str, text: &str) {
        self.texts_within
            .borrow_mut()
            .insert((container_id.to_string(), selector.to_string()), text.to_string());
    }

    fn set_value(&self, container_id: &str, selector: &str, value: &str) -> bool {
        let mut fields = self.fields.borrow_mut();
        match fields.get_mut(&(container_id.to_string(), selector.to_string())) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn value(&self, container_id: &str, selector: &str) -> Option<String> {
        self.field(container_id, selector)
    }

    fn focus(&self, container_id: &str, selector: &str) {
        *self.focused.borrow_mut() = Some((container_id.to_string(), selector.to_string()));
    }

    fn add_class(&self, element_id: &str, class: &str) {
        self.classes
            .borrow_mut()
            .entry(element_id.to_string())
            .or_default()
            .insert(class.to_string());
    }

    fn remove_class(&self, element_id: &str, class: &str) {
        if let Some(set) = self.classes.borrow_mut().get_mut(element_id) {
            set.remove(class);
        }
    }

    fn show_feedback(&self, element_id: &str, class: &str, text: &str) {
        self.classes.borrow_mut().insert(
            element_id.to_string(),
            class.split_whitespace().map(str::to_string).collect(),
        );
        self.put_text(element_id, text);
    }

    fn clear_feedback(&self, element_id: &str) {
        self.classes.borrow_mut().remove(element_id);
        self.put_text(element_id, "");
    }

    fn csrf_token(&self) -> Option<String> {
        self.csrf.borrow().clone()
    }

    fn form_fields(&self, form_id: &str) -> Vec<(String, String)> {
        self.forms.borrow().get(form_id).cloned().unwrap_or_default()
    }

    fn navigate(&self, location: &str) {
        self.navigations.borrow_mut().push(location.to_string());
    }

    fn show_banner(&self, message: &str) {
        self.banners.borrow_mut().push(message.to_string());
    }

    fn flash_row(&self, element_id: &str) {
        self.flashed.borrow_mut().push(element_id.to_string());
    }

    fn pulse(&self, element_id: &str) {
        self.pulsed.borrow_mut().push(element_id.to_string());
    }
}

// ========================
// Backend
// ========================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(String),
    Delete { token: String, id: String },
    Update { token: String, id: String, value: String },
    Login(Vec<(String, String)>),
}

pub struct FakeBackend {
    pub calls: RefCell<Vec<Call>>,
    pub record: RefCell<Result<RecordPayload, ApiError>>,
    pub delete: RefCell<Result<DeleteResponse, ApiError>>,
    pub update: RefCell<Result<(), ApiError>>,
    pub login: RefCell<Result<LoginResponse, ApiError>>,
    gates: RefCell<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            record: RefCell::new(Ok(RecordPayload::new())),
            delete: RefCell::new(Err(ApiError::Status(500))),
            update: RefCell::new(Ok(())),
            login: RefCell::new(Err(ApiError::Status(500))),
            gates: RefCell::new(HashMap::new()),
        }
    }
}

impl FakeBackend {
    /// Hold the next `op` call ("fetch", "delete", "update", "login") until
    /// the returned sender fires
    pub fn gate(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().entry(op).or_default().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    async fn pass_gate(&self, op: &'static str) {
        let gate = self.gates.borrow_mut().get_mut(op).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn fetch_record(&self, id: &RowId) -> Result<RecordPayload, ApiError> {
        self.calls.borrow_mut().push(Call::Fetch(id.to_string()));
        self.pass_gate("fetch").await;
        self.record.borrow().clone()
    }

    async fn delete_record(&self, csrf_token: &str, id: &RowId) -> Result<DeleteResponse, ApiError> {
        self.calls.borrow_mut().push(Call::Delete {
            token: csrf_token.to_string(),
            id: id.to_string(),
        });
        self.pass_gate("delete").await;
        self.delete.borrow().clone()
    }

    async fn update_value(&self, csrf_token: &str, id: &RowId, value: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Update {
            token: csrf_token.to_string(),
            id: id.to_string(),
            value: value.to_string(),
        });
        self.pass_gate("update").await;
        self.update.borrow().clone()
    }

    async fn login(&self, fields: &[(String, String)]) -> Result<LoginResponse, ApiError> {
        self.calls.borrow_mut().push(Call::Login(fields.to_vec()));
        self.pass_gate("login").await;
        self.login.borrow().clone()
    }
}

// ========================
// Timer
// ========================

struct Scheduled {
    due: u64,
    cancelled: Rc<Cell<bool>>,
    callback: Option<Box<dyn FnOnce()>>,
}

struct CancelOnDrop(Rc<Cell<bool>>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

/// Manually advanced clock
#[derive(Default)]
pub struct FakeTimer {
    now: Cell<u64>,
    scheduled: RefCell<Vec<Scheduled>>,
}

impl FakeTimer {
    /// Move the clock forward, firing everything that comes due in order
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut scheduled = self.scheduled.borrow_mut();
                scheduled.retain(|s| s.callback.is_some() && !s.cancelled.get());
                scheduled
                    .iter_mut()
                    .filter(|s| s.due <= target)
                    .min_by_key(|s| s.due)
                    .map(|s| (s.due, s.callback.take()))
            };
            match next {
                Some((due, Some(callback))) => {
                    self.now.set(due);
                    callback();
                }
                _ => break,
            }
        }
        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.scheduled
            .borrow()
            .iter()
            .filter(|s| s.callback.is_some() && !s.cancelled.get())
            .count()
    }
}

impl Timer for FakeTimer {
    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerGuard {
        let cancelled = Rc::new(Cell::new(false));
        self.scheduled.borrow_mut().push(Scheduled {
            due: self.now.get() + u64::from(delay_ms),
            cancelled: cancelled.clone(),
            callback: Some(callback),
        });
        TimerGuard::new(CancelOnDrop(cancelled))
    }

    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
