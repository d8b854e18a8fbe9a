// Per-screen state for the three views
// Each view owns its state exclusively; navigating away drops it

pub mod create;
pub mod edit;
pub mod form;
pub mod list;

pub use create::CreateView;
pub use edit::EditView;
pub use form::{FormField, FormPhase, FormState};
pub use list::{ListDisplay, ListView};

/// Navigation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Root: all records
    List,
    Create,
    Edit(String),
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::List => "Interpretations",
            Route::Create => "Add New Interpretation",
            Route::Edit(_) => "Edit Interpretation",
        }
    }
}

// User-facing messages. Every failure of an action maps to exactly one of these.
pub const LOAD_LIST_FAILED: &str = "Failed to load interpretations. Please try reloading the page.";
pub const DELETE_FAILED: &str = "Failed to delete interpretation. Please try again.";
pub const LOAD_RECORD_FAILED: &str = "Failed to load interpretations.";
pub const MISSING_FIELDS: &str = "Please fill in all the fields";
pub const SUBMIT_FAILED: &str = "Something went wrong. Please try again.";
pub const NO_RECORDS: &str = "No interpretations found.";
pub const LOADING_RECORDS: &str = "Loading interpretations...";
