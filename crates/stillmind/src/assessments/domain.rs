use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Identifier for the user who owns a record. Always taken from the verified
/// session token, never from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The closed set of supported screeners.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AssessmentType {
    #[serde(rename = "PHQ-9")]
    Phq9,
    #[serde(rename = "GAD-7")]
    Gad7,
}

impl AssessmentType {
    /// Resolve a caller-supplied type name after trimming and uppercasing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PHQ-9" => Some(Self::Phq9),
            "GAD-7" => Some(Self::Gad7),
            _ => None,
        }
    }

    /// Number of items on the questionnaire, and therefore the required
    /// response-vector length.
    pub const fn expected_len(self) -> usize {
        match self {
            Self::Phq9 => 9,
            Self::Gad7 => 7,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Phq9 => "PHQ-9",
            Self::Gad7 => "GAD-7",
        }
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored, persisted assessment. Immutable after creation: the only
/// lifecycle operations are create, read, and delete by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAssessment {
    pub id: AssessmentId,
    pub owner: UserId,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub responses: Vec<u8>,
    pub score: u16,
    pub severity: String,
    pub created_at: DateTime<Utc>,
}
