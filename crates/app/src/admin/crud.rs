//! Generic back-office list and form page.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{
    routes::{GuardDecision, guard_admin_layout},
    session::SessionStore,
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    admin::{Activatable, Resource, resource::Payload},
    api::{ApiClient, ApiError},
    navigation::Navigator,
    pages::ErrorBanner,
};

/// Whether the form creates a record or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// New record
    Create,

    /// Existing record with this id
    Edit(i64),
}

/// Open form.
#[derive(Debug, Clone)]
pub struct Editor<F> {
    /// Create or edit
    pub mode: EditorMode,

    /// Current field values
    pub form: F,
}

struct CrudState<R: Resource> {
    records: Vec<R>,
    editor: Option<Editor<R::Form>>,
    query: Vec<(&'static str, String)>,
    loading: bool,
    submitting: bool,
}

impl<R: Resource> Default for CrudState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            editor: None,
            query: Vec::new(),
            loading: false,
            submitting: false,
        }
    }
}

/// List, create, edit and delete records of one resource.
///
/// Every change is followed by a fresh fetch of the list; nothing is patched
/// locally.
pub struct CrudPage<R: Resource> {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    state: Mutex<CrudState<R>>,
}

impl<R: Resource> Debug for CrudPage<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CrudPage")
            .field("resource", &R::NAME)
            .field("records", &self.state().records.len())
            .finish_non_exhaustive()
    }
}

impl<R: Resource> CrudPage<R> {
    #[must_use]
    pub fn new(
        api: Arc<ApiClient>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
            banner: ErrorBanner::new(),
            state: Mutex::new(CrudState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CrudState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enforce the role gate, then load the list. Returns `false` when the
    /// visitor was sent to the login page.
    pub async fn mount(&self) -> bool {
        if let GuardDecision::Redirect(route) = guard_admin_layout(&self.session.current()) {
            debug!(resource = R::NAME, %route, "back-office page refused");

            self.navigator.navigate(route);

            return false;
        }

        self.load().await
    }

    /// Fetch the list with the current filter.
    pub async fn load(&self) -> bool {
        let query = {
            let mut state = self.state();
            state.loading = true;
            state.query.clone()
        };
        let query: Vec<(&str, &str)> = query
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();

        let result = if query.is_empty() {
            self.api.get::<Vec<R>>(R::PATH).await
        } else {
            self.api.get_with_query::<Vec<R>>(R::PATH, &query).await
        };

        let mut state = self.state();
        state.loading = false;

        match result {
            Ok(records) => {
                debug!(resource = R::NAME, count = records.len(), "records loaded");

                state.records = records;
                true
            }
            Err(error) => {
                drop(state);
                self.banner.report(&error);
                false
            }
        }
    }

    /// Set or clear a list filter and reload.
    pub async fn set_filter(&self, name: &'static str, value: Option<String>) -> bool {
        {
            let mut state = self.state();
            state.query.retain(|(existing, _)| *existing != name);

            if let Some(value) = value {
                state.query.push((name, value));
            }
        }

        self.load().await
    }

    /// Records from the last fetch.
    pub fn records(&self) -> Vec<R> {
        self.state().records.clone()
    }

    /// Record by id.
    pub fn record(&self, id: i64) -> Option<R> {
        self.state()
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Whether a fetch is running.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Whether a submit is running.
    pub fn is_submitting(&self) -> bool {
        self.state().submitting
    }

    /// Open form, if any.
    pub fn editor(&self) -> Option<Editor<R::Form>> {
        self.state().editor.clone()
    }

    /// Open an empty form.
    pub fn open_create(&self) {
        self.state().editor = Some(Editor {
            mode: EditorMode::Create,
            form: R::Form::default(),
        });
    }

    /// Open the form for a listed record.
    pub fn open_edit(&self, id: i64) -> bool {
        let mut state = self.state();

        let Some(record) = state.records.iter().find(|record| record.id() == id) else {
            return false;
        };

        state.editor = Some(Editor {
            mode: EditorMode::Edit(id),
            form: record.to_form(),
        });

        true
    }

    /// Change the open form.
    pub fn edit(&self, change: impl FnOnce(&mut R::Form)) -> bool {
        match self.state().editor.as_mut() {
            Some(editor) => {
                change(&mut editor.form);
                true
            }
            None => false,
        }
    }

    /// Close the form without saving.
    pub fn close_editor(&self) {
        self.state().editor = None;
    }

    /// Save the open form, then reload the list. The form stays open with
    /// the error shown when anything fails.
    pub async fn submit(&self) -> bool {
        let editor = {
            let mut state = self.state();

            if state.submitting {
                return false;
            }

            let Some(editor) = state.editor.clone() else {
                return false;
            };

            state.submitting = true;
            editor
        };

        let result = self.save(&editor).await;

        self.state().submitting = false;

        match result {
            Ok(()) => {
                info!(resource = R::NAME, mode = ?editor.mode, "record saved");

                self.banner.dismiss();
                self.close_editor();
                self.load().await;

                true
            }
            Err(message) => {
                self.banner.show(message);
                false
            }
        }
    }

    async fn save(&self, editor: &Editor<R::Form>) -> Result<(), String> {
        let fields = R::fields(&editor.form).map_err(|error| error.to_string())?;
        let payload = Payload::build(fields, R::image(&editor.form));

        let result = match (editor.mode, payload) {
            (EditorMode::Create, Payload::Json(body)) => {
                self.api.post::<_, Value>(R::PATH, &body).await
            }
            (EditorMode::Create, Payload::Form(form)) => {
                self.api.post_form::<Value>(R::PATH, form).await
            }
            (EditorMode::Edit(id), Payload::Json(body)) => {
                self.api.put::<_, Value>(&item_path::<R>(id), &body).await
            }
            (EditorMode::Edit(id), Payload::Form(form)) => {
                self.api.put_form::<Value>(&item_path::<R>(id), form).await
            }
        };

        result.map(|_| ()).map_err(|error| error.user_message())
    }

    /// Delete a record, then reload the list.
    pub async fn delete(&self, id: i64) -> bool {
        match self.api.delete(&item_path::<R>(id)).await {
            Ok(()) => {
                info!(resource = R::NAME, id, "record deleted");

                self.load().await;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }

    /// Hide the error banner.
    pub fn dismiss_error(&self) {
        self.banner.dismiss();
    }

    async fn patch(&self, id: i64, body: Value) -> Result<(), ApiError> {
        self.api
            .patch::<_, Value>(&item_path::<R>(id), &body)
            .await
            .map(|_| ())
    }
}

impl<R: Activatable> CrudPage<R> {
    /// Switch a record on or off, then reload the list.
    pub async fn set_active(&self, id: i64, active: bool) -> bool {
        match self
            .patch(id, json!({ "is_active": R::active_value(active) }))
            .await
        {
            Ok(()) => {
                info!(resource = R::NAME, id, active, "record toggled");

                self.load().await;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Flip a listed record's switch.
    pub async fn toggle_active(&self, id: i64) -> bool {
        let Some(record) = self.record(id) else {
            return false;
        };

        self.set_active(id, !record.is_active()).await
    }
}

fn item_path<R: Resource>(id: i64) -> String {
    format!("{}{id}/", R::PATH)
}
