//! The controller owns the application state and is the only thing that talks
//! to the backend. Views get `&AppState`; all mutation goes through intents.
//!
//! The snapshot is replaced wholesale from `GET /foods` after every mutation,
//! whether or not the mutation succeeded. Backend failures are logged and
//! swallowed; callers only see an [`Outcome`].

use anyhow::Result;
use tracing::{debug, error, info};

use crate::models::{FoodRecord, filter_records};

/// The four REST calls the controller needs.
///
/// The CLI implements this with reqwest; tests use an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait FoodsBackend {
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>>;
    async fn create(&self, payload: &FoodRecord) -> Result<()>;
    async fn update(&self, key: &str, payload: &FoodRecord) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Editing selection: `Idle` or `Editing(record)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Idle,
    Editing(FoodRecord),
}

impl Selection {
    #[must_use]
    pub fn record(&self) -> Option<&FoodRecord> {
        match self {
            Self::Idle => None,
            Self::Editing(record) => Some(record),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    records: Vec<FoodRecord>,
    selection: Selection,
    search: String,
}

impl AppState {
    /// Full snapshot, in backend order.
    #[must_use]
    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Records matching the current search text.
    #[must_use]
    pub fn visible(&self) -> Vec<&FoodRecord> {
        filter_records(&self.records, &self.search)
    }

    #[must_use]
    pub fn find(&self, food: &str) -> Option<&FoodRecord> {
        self.records.iter().find(|r| r.food == food)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Refresh,
    Submit(FoodRecord),
    RequestEdit(FoodRecord),
    RequestDelete(String),
    Cancel,
    SetSearch(String),
}

/// Result of an intent as reported to the front end. Never blocks the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Backend call succeeded, or no backend call was needed.
    Applied,
    /// Backend call failed; the error has been logged.
    Failed,
}

impl Outcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    fn from_result(result: &Result<()>) -> Self {
        if result.is_ok() {
            Self::Applied
        } else {
            Self::Failed
        }
    }
}

pub struct Controller<B> {
    backend: B,
    state: AppState,
}

impl<B: FoodsBackend> Controller<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Initial load.
    pub async fn mount(&mut self) -> Outcome {
        self.refresh().await
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Outcome {
        match intent {
            Intent::Refresh => self.refresh().await,
            Intent::Submit(payload) => self.submit(payload).await,
            Intent::RequestEdit(record) => {
                self.request_edit(record);
                Outcome::Applied
            }
            Intent::RequestDelete(name) => self.request_delete(&name).await,
            Intent::Cancel => {
                self.cancel();
                Outcome::Applied
            }
            Intent::SetSearch(text) => {
                self.set_search(text);
                Outcome::Applied
            }
        }
    }

    /// Replace the snapshot with the backend's collection. On failure the
    /// previous snapshot stays in place.
    pub async fn refresh(&mut self) -> Outcome {
        match self.backend.fetch_all().await {
            Ok(records) => {
                debug!(count = records.len(), "replacing food snapshot");
                self.state.records = records;
                Outcome::Applied
            }
            Err(e) => {
                error!("Failed to fetch foods: {e:#}");
                Outcome::Failed
            }
        }
    }

    /// Update when editing (addressed by the original key), create otherwise.
    /// The selection is cleared and the snapshot refreshed either way.
    pub async fn submit(&mut self, payload: FoodRecord) -> Outcome {
        let result = match &self.state.selection {
            Selection::Editing(original) => {
                info!(food = %original.food, "updating food");
                self.backend.update(&original.food, &payload).await
            }
            Selection::Idle => {
                info!(food = %payload.food, "creating food");
                self.backend.create(&payload).await
            }
        };
        if let Err(e) = &result {
            error!("Failed to save food: {e:#}");
        }
        self.state.selection = Selection::Idle;
        self.refresh().await;
        Outcome::from_result(&result)
    }

    pub async fn request_delete(&mut self, name: &str) -> Outcome {
        info!(food = %name, "deleting food");
        let result = self.backend.delete(name).await;
        if let Err(e) = &result {
            error!("Failed to delete food: {e:#}");
        }
        self.refresh().await;
        Outcome::from_result(&result)
    }

    /// Last request wins.
    pub fn request_edit(&mut self, record: FoodRecord) {
        self.state.selection = Selection::Editing(record);
    }

    pub fn cancel(&mut self) {
        self.state.selection = Selection::Idle;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
    }
}
