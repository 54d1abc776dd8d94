pub mod error;
pub mod ids;
pub mod messages;
pub mod pages;
pub mod repository;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::{AppState, AppStateInner};
