//! Pure scoring engine: response vector in, total score and severity out.

use serde::Serialize;
use serde_json::Value;

use super::domain::AssessmentType;

/// One row of a per-type severity table: an inclusive upper bound and the
/// label assigned to scores at or below it. A `None` bound is open-ended and
/// terminates the table.
#[derive(Debug, Clone, Copy)]
pub struct SeverityBand {
    pub upper_inclusive: Option<u16>,
    pub label: &'static str,
}

const PHQ9_BANDS: &[SeverityBand] = &[
    SeverityBand {
        upper_inclusive: Some(4),
        label: "None-minimal",
    },
    SeverityBand {
        upper_inclusive: Some(9),
        label: "Mild",
    },
    SeverityBand {
        upper_inclusive: Some(14),
        label: "Moderate",
    },
    SeverityBand {
        upper_inclusive: Some(19),
        label: "Moderately severe",
    },
    SeverityBand {
        upper_inclusive: None,
        label: "Severe",
    },
];

const GAD7_BANDS: &[SeverityBand] = &[
    SeverityBand {
        upper_inclusive: Some(4),
        label: "Minimal anxiety",
    },
    SeverityBand {
        upper_inclusive: Some(9),
        label: "Mild anxiety",
    },
    SeverityBand {
        upper_inclusive: Some(14),
        label: "Moderate anxiety",
    },
    SeverityBand {
        upper_inclusive: None,
        label: "Severe anxiety",
    },
];

impl AssessmentType {
    pub(crate) fn bands(self) -> &'static [SeverityBand] {
        match self {
            AssessmentType::Phq9 => PHQ9_BANDS,
            AssessmentType::Gad7 => GAD7_BANDS,
        }
    }
}

/// Validation failures for a submitted response vector.
///
/// These are the caller-input errors: the caller can correct the request and
/// resubmit. Structured fields carry what the response payload needs, so no
/// message parsing is required downstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("assessment type and responses array are required")]
    MissingInput,
    #[error("invalid assessment type: {raw}")]
    InvalidType { raw: String },
    #[error("expected {expected} responses for {kind}, got {actual}")]
    LengthMismatch {
        kind: AssessmentType,
        expected: usize,
        actual: usize,
    },
    #[error("response at index {index} must be one of 0, 1, 2, or 3 (got {value})")]
    OutOfRangeResponse { index: usize, value: Value },
}

/// Result of scoring a valid response vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub score: u16,
    pub severity: &'static str,
}

/// Score an ordered response vector against the declared screener.
///
/// Deterministic and side-effect free: length is checked against the type,
/// every element must be a member of {0,1,2,3} (the first offender is
/// reported), and the score is the plain arithmetic sum mapped through the
/// type's severity table.
pub fn score(kind: AssessmentType, responses: &[i64]) -> Result<ScoreOutcome, ScoringError> {
    let expected = kind.expected_len();
    if responses.len() != expected {
        return Err(ScoringError::LengthMismatch {
            kind,
            expected,
            actual: responses.len(),
        });
    }

    let mut total: u16 = 0;
    for (index, &value) in responses.iter().enumerate() {
        if !(0..=3).contains(&value) {
            return Err(ScoringError::OutOfRangeResponse {
                index,
                value: Value::from(value),
            });
        }
        total += value as u16;
    }

    Ok(ScoreOutcome {
        score: total,
        severity: severity_for(kind, total),
    })
}

/// Score a raw JSON response vector, as submitted over HTTP.
///
/// Length is checked before elements, so a short vector reports as a length
/// mismatch even when it also contains invalid members. A non-integer element
/// is classified exactly like an out-of-set integer, carrying its position
/// and the offending value.
pub fn score_raw(kind: AssessmentType, values: &[Value]) -> Result<ScoreOutcome, ScoringError> {
    let expected = kind.expected_len();
    if values.len() != expected {
        return Err(ScoringError::LengthMismatch {
            kind,
            expected,
            actual: values.len(),
        });
    }

    let responses = integer_responses(values)?;
    score(kind, &responses)
}

/// Convert submitted elements to integers; the first non-integer reports its
/// position. JSON floats with no fractional part count as integers.
pub(crate) fn integer_responses(values: &[Value]) -> Result<Vec<i64>, ScoringError> {
    let mut responses = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match as_integer(value) {
            Some(number) => responses.push(number),
            None => {
                return Err(ScoringError::OutOfRangeResponse {
                    index,
                    value: value.clone(),
                })
            }
        }
    }
    Ok(responses)
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|float| float.fract() == 0.0)
            .map(|float| float as i64)
    })
}

/// Map a total score to its severity label via the type's band table.
/// Evaluated low-to-high; the first band whose bound covers the score wins.
pub fn severity_for(kind: AssessmentType, score: u16) -> &'static str {
    let bands = kind.bands();
    for band in bands {
        if band.upper_inclusive.map_or(true, |upper| score <= upper) {
            return band.label;
        }
    }
    // Tables always terminate with an open-ended band.
    bands[bands.len() - 1].label
}
