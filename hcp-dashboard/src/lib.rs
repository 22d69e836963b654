pub mod api;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;
pub mod terms;

// Re-export commonly used types
pub use api::{ApiClient, ApiClientConfig};
pub use controller::{DashboardController, ViewState};
pub use error::{DashboardError, Result};
pub use session::{InMemorySessionStore, Session, SessionStore};
