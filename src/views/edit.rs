use super::form::FormState;
use super::{Route, LOAD_RECORD_FAILED};
use crate::error::ApiResult;
use crate::model::InterpretationDraft;
use crate::request::Request;

#[derive(Debug, Clone)]
pub struct EditView {
    /// Captured from the route; updates always target this id
    id: String,
    pub form: FormState,
}

impl EditView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            form: FormState::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Request issued when the view is activated.
    pub fn load_request(&self) -> Request {
        Request::FetchOne {
            id: self.id.clone(),
        }
    }

    pub fn apply_loaded(&mut self, result: ApiResult<InterpretationDraft>) {
        match result {
            Ok(values) => self.form.replace_values(values),
            Err(e) => {
                tracing::warn!(id = %self.id, error = %e, "failed to load interpretation");
                self.form.set_error(LOAD_RECORD_FAILED);
            }
        }
    }

    pub fn submit_request(&mut self) -> Option<Request> {
        let id = self.id.clone();
        self.form
            .begin_submit()
            .map(|draft| Request::Update { id, draft })
    }

    pub fn apply_submitted(&mut self, result: ApiResult<()>) -> Option<Route> {
        self.form.finish_submit(result)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.form.is_submitting() {
            "Updating..."
        } else {
            "Update Interpretation"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::views::{FormField, MISSING_FIELDS};

    #[test]
    fn test_load_populates_form() {
        let mut view = EditView::new("abc");
        assert_eq!(
            view.load_request(),
            Request::FetchOne {
                id: "abc".to_string()
            }
        );

        view.apply_loaded(Ok(InterpretationDraft::new("t", "i")));
        assert_eq!(view.form.value(FormField::Term), "t");
        assert_eq!(view.form.value(FormField::Interpretation), "i");
        assert_eq!(view.form.error(), None);
    }

    #[test]
    fn test_load_failure_leaves_form_empty() {
        let mut view = EditView::new("missing");
        view.apply_loaded(Err(ApiError::Status {
            method: "GET",
            url: "http://localhost:3000/api/interpretations/missing".to_string(),
            status: 404,
        }));

        assert_eq!(view.form.values(), &InterpretationDraft::default());
        assert_eq!(view.form.error(), Some(LOAD_RECORD_FAILED));
        assert_eq!(LOAD_RECORD_FAILED, "Failed to load interpretations.");

        // An empty form cannot be submitted either
        assert_eq!(view.submit_request(), None);
        assert_eq!(view.form.error(), Some(MISSING_FIELDS));
    }

    #[test]
    fn test_update_targets_captured_id() {
        let mut view = EditView::new("abc");
        view.apply_loaded(Ok(InterpretationDraft::new("t", "i")));
        view.form.set_field(FormField::Term, "new term");

        assert_eq!(
            view.submit_request(),
            Some(Request::Update {
                id: "abc".to_string(),
                draft: InterpretationDraft::new("new term", "i"),
            })
        );
        assert_eq!(view.submit_label(), "Updating...");
    }
}
