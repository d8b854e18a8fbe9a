use serde::{Deserialize, Serialize};

/// A persisted interpretation record.
///
/// `id` is assigned by the backend when the record is created and never
/// changes afterwards. Hosted backends spell it `$id`, so both keys are
/// accepted when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(alias = "$id")]
    pub id: String,
    pub term: String,
    pub interpretation: String,
}

impl Interpretation {
    pub fn from_draft(id: impl Into<String>, draft: InterpretationDraft) -> Self {
        Self {
            id: id.into(),
            term: draft.term,
            interpretation: draft.interpretation,
        }
    }

    /// Editable copy of the two text fields.
    pub fn draft(&self) -> InterpretationDraft {
        InterpretationDraft {
            term: self.term.clone(),
            interpretation: self.interpretation.clone(),
        }
    }
}

/// Body of create and update requests, and the contents of an edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationDraft {
    pub term: String,
    pub interpretation: String,
}

impl InterpretationDraft {
    pub fn new(term: impl Into<String>, interpretation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            interpretation: interpretation.into(),
        }
    }

    /// Both fields must be non-empty before a draft may be submitted.
    pub fn is_complete(&self) -> bool {
        !self.term.is_empty() && !self.interpretation.is_empty()
    }
}

/// Wrapper used by the single-record GET response:
/// `{"interpretation": {"term": ..., "interpretation": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub interpretation: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_accepts_dollar_id() {
        let json = r#"{"$id":"abc","term":"t","interpretation":"i","$createdAt":"2024-01-01"}"#;
        let record: Interpretation = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "abc");
        assert_eq!(record.term, "t");
        assert_eq!(record.interpretation, "i");
    }

    #[test]
    fn test_encode_uses_plain_id() {
        let record = Interpretation::from_draft("42", InterpretationDraft::new("t", "i"));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["id"], "42");
        assert!(value.get("$id").is_none());
    }

    #[test]
    fn test_draft_completeness() {
        assert!(InterpretationDraft::new("t", "i").is_complete());
        assert!(!InterpretationDraft::new("", "i").is_complete());
        assert!(!InterpretationDraft::new("t", "").is_complete());
        assert!(!InterpretationDraft::default().is_complete());
        // Only emptiness is checked
        assert!(InterpretationDraft::new(" ", " ").is_complete());
    }

    #[test]
    fn test_envelope_ignores_extra_fields() {
        let json = r#"{"interpretation":{"id":"9","term":"t","interpretation":"i"}}"#;
        let envelope: Envelope<InterpretationDraft> = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.interpretation, InterpretationDraft::new("t", "i"));
    }
}
