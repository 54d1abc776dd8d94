use std::sync::Arc;

use clipshare_db::StoreClient;

use crate::error::ApiError;
use crate::repository::MessageRepository;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub repo: MessageRepository,
    /// Public base URL for absolute links on rendered pages. `None` means
    /// links are relative to whatever origin served the page.
    pub base_url: Option<String>,
}

impl AppStateInner {
    pub fn new(store: Arc<StoreClient>, base_url: Option<String>) -> AppState {
        Arc::new(Self {
            repo: MessageRepository::new(store),
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn link_base(&self) -> &str {
        self.base_url.as_deref().unwrap_or("")
    }
}

/// Run a repository call off the async runtime; store calls block.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&MessageRepository) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.repo)).await?
}
