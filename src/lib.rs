// Interpretations - Core Library
// Exposes the record API client, view state and storage for the CLI, dev server and tests

pub mod api;
pub mod app;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod request;
pub mod views;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use api::{ApiConfig, HttpApi, InterpretationApi, DEFAULT_API_URL};
pub use app::{App, Screen, Ticket};
pub use error::{ApiError, ApiResult};
pub use model::{Envelope, Interpretation, InterpretationDraft};
pub use request::{Outcome, Request};
pub use views::{CreateView, EditView, FormField, FormPhase, FormState, ListDisplay, ListView, Route};
