//! Presentation state holder for the diary screens.
//!
//! # Design
//! `DiaryModel` owns the published `DiaryState` (entry list, status, error
//! message) behind a `watch` channel. Each operation performs exactly one
//! network round-trip on the blocking pool, then publishes the outcome.
//! Mutations never touch the list locally; on success they refetch with
//! `retrieve`, so the list is always the last successful server response
//! for the user it was fetched for.
//!
//! Only `retrieve` moves `status`. A failed mutation leaves the status and
//! the list as they were and only sets the message. Errors are never
//! propagated to the caller; the UI shows the message once and then
//! dismisses it with `clear_message`.
//! In-flight calls are not cancelled; callers should not overlap operations
//! for the same user.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::TravelClient;
use crate::error::ApiError;
use crate::photo::encode_jpeg;
use crate::transport::Transport;
use crate::types::{Travel, TravelForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryState {
    pub travels: Vec<Travel>,
    pub status: ApiStatus,
    pub error_message: Option<String>,
    /// User id the last `retrieve` targeted; `travels` belongs to this user.
    pub owner: Option<String>,
}

impl Default for DiaryState {
    fn default() -> Self {
        Self {
            travels: Vec::new(),
            status: ApiStatus::Loading,
            error_message: None,
            owner: None,
        }
    }
}

/// A user action, for running an operation through `DiaryModel::launch`.
#[derive(Debug, Clone)]
pub enum Action {
    Retrieve {
        user_id: String,
    },
    Create {
        user_id: String,
        title: String,
        description: String,
        image: Vec<u8>,
    },
    Update {
        user_id: String,
        id: i64,
        title: String,
        description: String,
        image: Vec<u8>,
    },
    Delete {
        user_id: String,
        id: i64,
    },
}

pub struct DiaryModel<T> {
    client: TravelClient,
    transport: Arc<T>,
    state: watch::Sender<DiaryState>,
}

impl<T: Transport + 'static> DiaryModel<T> {
    pub fn new(client: TravelClient, transport: T) -> Self {
        let (state, _) = watch::channel(DiaryState::default());
        Self {
            client,
            transport: Arc::new(transport),
            state,
        }
    }

    pub fn client(&self) -> &TravelClient {
        &self.client
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> DiaryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DiaryState> {
        self.state.subscribe()
    }

    /// Fetch the user's entries and replace the list on success.
    ///
    /// Switching to another user drops the previous user's entries up front,
    /// so a failed fetch never leaves them on screen.
    pub async fn retrieve(&self, user_id: &str) {
        self.state.send_modify(|s| {
            s.status = ApiStatus::Loading;
            if s.owner.as_deref() != Some(user_id) {
                s.travels.clear();
                s.owner = Some(user_id.to_string());
            }
        });
        match self.fetch(user_id).await {
            Ok(travels) => {
                tracing::info!(user_id, count = travels.len(), "travels retrieved");
                self.state.send_modify(|s| {
                    s.travels = travels;
                    s.status = ApiStatus::Success;
                    s.error_message = None;
                });
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "retrieve failed");
                self.state.send_modify(|s| {
                    s.status = ApiStatus::Failed;
                    s.error_message = Some(e.to_string());
                });
            }
        }
    }

    pub async fn create(&self, user_id: &str, title: &str, description: &str, image: &[u8]) {
        let result = self.upload(user_id, None, title, description, image).await;
        self.settle(user_id, result, "Error").await;
    }

    pub async fn update(&self, user_id: &str, id: i64, title: &str, description: &str, image: &[u8]) {
        let result = self.upload(user_id, Some(id), title, description, image).await;
        self.settle(user_id, result, "Error updating").await;
    }

    pub async fn delete(&self, user_id: &str, id: i64) {
        let result = self.remove(user_id, id).await;
        self.settle(user_id, result, "Error deleting").await;
    }

    /// Dismiss the current error message.
    pub fn clear_message(&self) {
        self.state.send_if_modified(|s| s.error_message.take().is_some());
    }

    /// Run `action` on the tokio runtime without waiting for it.
    pub fn launch(self: &Arc<Self>, action: Action) -> JoinHandle<()> {
        let model = Arc::clone(self);
        tokio::spawn(async move { model.run(action).await })
    }

    pub async fn run(&self, action: Action) {
        match action {
            Action::Retrieve { user_id } => self.retrieve(&user_id).await,
            Action::Create {
                user_id,
                title,
                description,
                image,
            } => self.create(&user_id, &title, &description, &image).await,
            Action::Update {
                user_id,
                id,
                title,
                description,
                image,
            } => self.update(&user_id, id, &title, &description, &image).await,
            Action::Delete { user_id, id } => self.delete(&user_id, id).await,
        }
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<Travel>, ApiError> {
        require_user(user_id)?;
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let user_id = user_id.to_string();
        blocking(move || {
            let response = transport.execute(client.build_list_travels(&user_id))?;
            client.parse_list_travels(response)
        })
        .await
    }

    async fn upload(
        &self,
        user_id: &str,
        id: Option<i64>,
        title: &str,
        description: &str,
        image: &[u8],
    ) -> Result<(), ApiError> {
        require_user(user_id)?;
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let user_id = user_id.to_string();
        let title = title.to_string();
        let description = description.to_string();
        let raw = image.to_vec();
        blocking(move || {
            let form = TravelForm {
                title,
                description,
                image: encode_jpeg(&raw)?,
            };
            match id {
                None => {
                    let response = transport.execute(client.build_create_travel(&user_id, &form))?;
                    client.parse_create_travel(response)
                }
                Some(id) => {
                    let response = transport.execute(client.build_update_travel(&user_id, id, &form))?;
                    client.parse_update_travel(response)
                }
            }
        })
        .await
    }

    async fn remove(&self, user_id: &str, id: i64) -> Result<(), ApiError> {
        require_user(user_id)?;
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let user_id = user_id.to_string();
        blocking(move || {
            let response = transport.execute(client.build_delete_travel(&user_id, id))?;
            client.parse_delete_travel(response)
        })
        .await
    }

    /// Refetch after a successful mutation, or record the failure message.
    async fn settle(&self, user_id: &str, result: Result<(), ApiError>, context: &str) {
        match result {
            Ok(()) => self.retrieve(user_id).await,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "{context}");
                let message = format!("{context}: {e}");
                self.state.send_modify(|s| s.error_message = Some(message));
            }
        }
    }
}

fn require_user(user_id: &str) -> Result<(), ApiError> {
    if user_id.trim().is_empty() {
        Err(ApiError::MissingUser)
    } else {
        Ok(())
    }
}

async fn blocking<F, R>(f: F) -> Result<R, ApiError>
where
    F: FnOnce() -> Result<R, ApiError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Transport(format!("request task failed: {e}")))?
}
