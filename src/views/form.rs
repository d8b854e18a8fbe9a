//! Form state shared by the create and edit views.
//!
//! `Idle -> Submitting -> (success: navigate to list) | (failure: Idle + error)`

use super::{Route, MISSING_FIELDS, SUBMIT_FAILED};
use crate::error::ApiResult;
use crate::model::InterpretationDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Term,
    Interpretation,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Term => FormField::Interpretation,
            FormField::Interpretation => FormField::Term,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Term => "Term",
            FormField::Interpretation => "Interpretation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone)]
pub struct FormState {
    values: InterpretationDraft,
    focus: FormField,
    phase: FormPhase,
    error: Option<&'static str>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            values: InterpretationDraft::default(),
            focus: FormField::Term,
            phase: FormPhase::Idle,
            error: None,
        }
    }

    pub fn values(&self) -> &InterpretationDraft {
        &self.values
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Term => &self.values.term,
            FormField::Interpretation => &self.values.interpretation,
        }
    }

    /// Replace both fields, e.g. after the edit view fetched its record.
    /// Focus, phase and error are left alone.
    pub fn replace_values(&mut self, values: InterpretationDraft) {
        self.values = values;
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn insert_char(&mut self, c: char) {
        let field = self.focus;
        self.field_mut(field).push(c);
    }

    pub fn delete_char(&mut self) {
        let field = self.focus;
        self.field_mut(field).pop();
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn set_error(&mut self, message: &'static str) {
        self.error = Some(message);
    }

    /// Validate and enter `Submitting`.
    ///
    /// Returns the payload to send, or `None` when nothing may be sent: either
    /// a submission is already in flight or a field is empty (in which case
    /// the validation message is set).
    pub fn begin_submit(&mut self) -> Option<InterpretationDraft> {
        if self.is_submitting() {
            tracing::debug!("submit ignored, request already in flight");
            return None;
        }

        if !self.values.is_complete() {
            self.error = Some(MISSING_FIELDS);
            return None;
        }

        self.error = None;
        self.phase = FormPhase::Submitting;
        Some(self.values.clone())
    }

    /// Apply the result of the create/update request.
    ///
    /// Always returns to `Idle`; yields the list route on success.
    pub fn finish_submit(&mut self, result: ApiResult<()>) -> Option<Route> {
        self.phase = FormPhase::Idle;

        match result {
            Ok(()) => Some(Route::List),
            Err(e) => {
                tracing::warn!(error = %e, "submit failed");
                self.error = Some(SUBMIT_FAILED);
                None
            }
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Term => &mut self.values.term,
            FormField::Interpretation => &mut self.values.interpretation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn filled() -> FormState {
        let mut form = FormState::new();
        form.set_field(FormField::Term, "ephemeral");
        form.set_field(FormField::Interpretation, "lasting a very short time");
        form
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = FormState::new();
        form.insert_char('a');
        form.insert_char('b');
        form.focus_next();
        form.insert_char('c');
        form.delete_char();
        form.insert_char('d');

        assert_eq!(form.value(FormField::Term), "ab");
        assert_eq!(form.value(FormField::Interpretation), "d");
        assert_eq!(form.focus(), FormField::Interpretation);
    }

    #[test]
    fn test_empty_field_blocks_submit() {
        let mut form = FormState::new();
        form.set_field(FormField::Term, "only a term");

        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.error(), Some(MISSING_FIELDS));
        assert!(!form.is_submitting());

        let mut form = FormState::new();
        form.set_field(FormField::Interpretation, "only a definition");
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.error(), Some(MISSING_FIELDS));
    }

    #[test]
    fn test_valid_submit_enters_submitting() {
        let mut form = filled();
        form.set_error(SUBMIT_FAILED);

        let draft = form.begin_submit().unwrap();
        assert_eq!(
            draft,
            InterpretationDraft::new("ephemeral", "lasting a very short time")
        );
        assert!(form.is_submitting());
        assert_eq!(form.error(), None);

        // Second submit while in flight is ignored
        assert_eq!(form.begin_submit(), None);
    }

    #[test]
    fn test_finish_success_navigates() {
        let mut form = filled();
        form.begin_submit().unwrap();

        assert_eq!(form.finish_submit(Ok(())), Some(Route::List));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_finish_failure_stays() {
        let mut form = filled();
        form.begin_submit().unwrap();

        let route = form.finish_submit(Err(ApiError::Status {
            method: "POST",
            url: "http://localhost/api/interpretations".to_string(),
            status: 500,
        }));

        assert_eq!(route, None);
        assert!(!form.is_submitting());
        assert_eq!(form.error(), Some(SUBMIT_FAILED));
        // Values survive so the user can resubmit
        assert_eq!(form.value(FormField::Term), "ephemeral");
    }
}
