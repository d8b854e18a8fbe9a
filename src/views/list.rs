use super::{Route, DELETE_FAILED, LOAD_LIST_FAILED};
use crate::error::ApiResult;
use crate::model::Interpretation;
use crate::request::Request;
use std::collections::HashSet;

/// What the list body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay<'a> {
    Loading,
    Empty,
    Rows(&'a [Interpretation]),
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    records: Vec<Interpretation>,
    loading: bool,
    error: Option<&'static str>,
    /// Ids with a delete request in flight
    deleting: HashSet<String>,
    selected: Option<usize>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request issued when the view is activated (and on reload).
    pub fn load_request(&mut self) -> Request {
        self.loading = true;
        self.error = None;
        Request::ListAll
    }

    pub fn apply_loaded(&mut self, result: ApiResult<Vec<Interpretation>>) {
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "interpretations loaded");
                self.records = records;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load interpretations");
                self.error = Some(LOAD_LIST_FAILED);
            }
        }
    }

    pub fn display(&self) -> ListDisplay<'_> {
        if self.loading {
            ListDisplay::Loading
        } else if self.records.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Rows(&self.records)
        }
    }

    pub fn records(&self) -> &[Interpretation] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Start deleting `id`.
    ///
    /// Returns `None` when a delete for the same id is already in flight or
    /// the id is not in the list.
    pub fn begin_delete(&mut self, id: &str) -> Option<Request> {
        if !self.records.iter().any(|r| r.id == id) {
            return None;
        }
        if !self.deleting.insert(id.to_string()) {
            tracing::debug!(id, "delete already in flight");
            return None;
        }

        Some(Request::Delete { id: id.to_string() })
    }

    /// Apply the delete result. The record is removed only on success.
    pub fn finish_delete(&mut self, id: &str, result: ApiResult<()>) {
        self.deleting.remove(id);

        match result {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to delete interpretation");
                self.error = Some(DELETE_FAILED);
            }
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&Interpretation> {
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn select_next(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn select_previous(&mut self) {
        let len = self.records.len();
        if len == 0 {
            return;
        }
        let i = match self.selected {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn edit_route(&self) -> Option<Route> {
        self.selected_record().map(|r| Route::Edit(r.id.clone()))
    }

    fn clamp_selection(&mut self) {
        let len = self.records.len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
    }
}
