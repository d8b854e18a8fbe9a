use super::form::FormState;
use super::Route;
use crate::error::ApiResult;
use crate::request::Request;

#[derive(Debug, Clone, Default)]
pub struct CreateView {
    pub form: FormState,
}

impl CreateView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_request(&mut self) -> Option<Request> {
        self.form
            .begin_submit()
            .map(|draft| Request::Create { draft })
    }

    pub fn apply_submitted(&mut self, result: ApiResult<()>) -> Option<Route> {
        self.form.finish_submit(result)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.form.is_submitting() {
            "Adding..."
        } else {
            "Add Interpretation"
        }
    }
}
