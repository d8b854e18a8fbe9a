//! Backend requests as plain values.
//!
//! Views never call the API themselves. They produce a `Request`; the runtime
//! executes it and hands the `Outcome` back to the view that asked for it.

use crate::api::InterpretationApi;
use crate::error::{ApiError, ApiResult};
use crate::model::{Interpretation, InterpretationDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListAll,
    FetchOne { id: String },
    Create { draft: InterpretationDraft },
    Update { id: String, draft: InterpretationDraft },
    Delete { id: String },
}

/// Successful result of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Records(Vec<Interpretation>),
    Record(InterpretationDraft),
    Done,
}

impl Request {
    pub fn execute<A: InterpretationApi + ?Sized>(&self, api: &A) -> ApiResult<Outcome> {
        match self {
            Request::ListAll => api.list().map(Outcome::Records),
            Request::FetchOne { id } => api.get(id).map(Outcome::Record),
            Request::Create { draft } => api.create(draft).map(|_| Outcome::Done),
            Request::Update { id, draft } => api.update(id, draft).map(|_| Outcome::Done),
            Request::Delete { id } => api.delete(id).map(|_| Outcome::Done),
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Request::ListAll | Request::FetchOne { .. } => "GET",
            Request::Create { .. } => "POST",
            Request::Update { .. } => "PUT",
            Request::Delete { .. } => "DELETE",
        }
    }
}

impl Outcome {
    pub fn into_records(self) -> ApiResult<Vec<Interpretation>> {
        match self {
            Outcome::Records(records) => Ok(records),
            other => Err(unexpected("record list", &other)),
        }
    }

    pub fn into_record(self) -> ApiResult<InterpretationDraft> {
        match self {
            Outcome::Record(draft) => Ok(draft),
            other => Err(unexpected("single record", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &Outcome) -> ApiError {
    ApiError::Decode {
        url: String::new(),
        message: format!("expected {expected}, got {got:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        let records = vec![Interpretation::from_draft(
            "1",
            InterpretationDraft::new("t", "i"),
        )];

        assert_eq!(
            Outcome::Records(records.clone()).into_records().unwrap(),
            records
        );
        assert!(Outcome::Done.into_records().is_err());
        assert_eq!(
            Outcome::Record(InterpretationDraft::new("t", "i"))
                .into_record()
                .unwrap(),
            InterpretationDraft::new("t", "i")
        );
        assert!(Outcome::Records(vec![]).into_record().is_err());
    }

    #[test]
    fn test_methods() {
        assert_eq!(Request::ListAll.method(), "GET");
        assert_eq!(
            Request::Delete {
                id: "1".to_string()
            }
            .method(),
            "DELETE"
        );
    }
}
