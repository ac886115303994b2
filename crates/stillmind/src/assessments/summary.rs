//! Summary aggregation: a pure reduction over one user's scored assessments.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{AssessmentType, ScoredAssessment};

/// Per-type statistics derived from a user's assessment history. Recomputed
/// on every read; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub count: usize,
    pub average_score: f64,
    pub latest_severity: String,
    pub latest_created_at: DateTime<Utc>,
}

struct Accumulator {
    count: usize,
    total: u32,
    latest_severity: String,
    latest_created_at: DateTime<Utc>,
}

/// Group `records` by type and compute count, mean score, and most-recent
/// severity per group. The input is assumed pre-filtered to a single owner.
///
/// Averages are rounded to 2 decimal places, half away from zero. When two
/// records share the maximum timestamp, the one seen later in input order
/// supplies the latest severity; callers that need a deterministic winner
/// must order the input.
pub fn summarize(records: &[ScoredAssessment]) -> BTreeMap<AssessmentType, SummaryEntry> {
    let mut grouped: BTreeMap<AssessmentType, Accumulator> = BTreeMap::new();

    for record in records {
        match grouped.get_mut(&record.kind) {
            Some(acc) => {
                acc.count += 1;
                acc.total += u32::from(record.score);
                if record.created_at >= acc.latest_created_at {
                    acc.latest_severity = record.severity.clone();
                    acc.latest_created_at = record.created_at;
                }
            }
            None => {
                grouped.insert(
                    record.kind,
                    Accumulator {
                        count: 1,
                        total: u32::from(record.score),
                        latest_severity: record.severity.clone(),
                        latest_created_at: record.created_at,
                    },
                );
            }
        }
    }

    grouped
        .into_iter()
        .map(|(kind, acc)| {
            (
                kind,
                SummaryEntry {
                    count: acc.count,
                    average_score: round_two_places(f64::from(acc.total) / acc.count as f64),
                    latest_severity: acc.latest_severity,
                    latest_created_at: acc.latest_created_at,
                },
            )
        })
        .collect()
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessments::domain::{AssessmentId, UserId};
    use crate::assessments::scoring::severity_for;
    use chrono::TimeZone;

    fn record(
        id: &str,
        kind: AssessmentType,
        score: u16,
        created_at: DateTime<Utc>,
    ) -> ScoredAssessment {
        ScoredAssessment {
            id: AssessmentId(id.to_string()),
            owner: UserId("user-000001".to_string()),
            kind,
            responses: Vec::new(),
            score,
            severity: severity_for(kind, score).to_string(),
            created_at,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn two_phq9_records_average_and_track_recency() {
        let records = vec![
            record("a-1", AssessmentType::Phq9, 5, at(9)),
            record("a-2", AssessmentType::Phq9, 15, at(18)),
        ];

        let summary = summarize(&records);
        let entry = summary.get(&AssessmentType::Phq9).expect("grouped");
        assert_eq!(entry.count, 2);
        assert_eq!(entry.average_score, 10.0);
        assert_eq!(entry.latest_severity, "Moderately severe");
        assert_eq!(entry.latest_created_at, at(18));
    }

    #[test]
    fn groups_are_keyed_per_type() {
        let records = vec![
            record("a-1", AssessmentType::Phq9, 5, at(9)),
            record("a-2", AssessmentType::Gad7, 8, at(10)),
            record("a-3", AssessmentType::Phq9, 7, at(11)),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[&AssessmentType::Phq9].count, 2);
        assert_eq!(summary[&AssessmentType::Gad7].count, 1);
        assert_eq!(summary[&AssessmentType::Gad7].average_score, 8.0);
    }

    #[test]
    fn count_and_average_are_order_independent() {
        let mut records = vec![
            record("a-1", AssessmentType::Phq9, 3, at(9)),
            record("a-2", AssessmentType::Phq9, 12, at(10)),
            record("a-3", AssessmentType::Phq9, 20, at(11)),
        ];

        let forward = summarize(&records);
        records.reverse();
        let backward = summarize(&records);

        assert_eq!(
            forward[&AssessmentType::Phq9].count,
            backward[&AssessmentType::Phq9].count
        );
        assert_eq!(
            forward[&AssessmentType::Phq9].average_score,
            backward[&AssessmentType::Phq9].average_score
        );
        assert_eq!(
            forward[&AssessmentType::Phq9].latest_severity,
            backward[&AssessmentType::Phq9].latest_severity
        );
    }

    #[test]
    fn equal_timestamps_prefer_the_later_record_in_input_order() {
        let tied = at(12);
        let records = vec![
            record("a-1", AssessmentType::Gad7, 2, tied),
            record("a-2", AssessmentType::Gad7, 16, tied),
        ];

        let entry = &summarize(&records)[&AssessmentType::Gad7];
        assert_eq!(entry.latest_severity, "Severe anxiety");

        let reversed = vec![
            record("a-2", AssessmentType::Gad7, 16, tied),
            record("a-1", AssessmentType::Gad7, 2, tied),
        ];
        let entry = &summarize(&reversed)[&AssessmentType::Gad7];
        assert_eq!(entry.latest_severity, "Minimal anxiety");
    }

    #[test]
    fn averages_round_half_away_from_zero() {
        // 81 / 8 = 10.125, exactly representable; rounds up to 10.13.
        let records: Vec<ScoredAssessment> = [10u16, 10, 10, 10, 10, 10, 10, 11]
            .iter()
            .enumerate()
            .map(|(i, &s)| record(&format!("a-{i}"), AssessmentType::Phq9, s, at(9)))
            .collect();

        let entry = &summarize(&records)[&AssessmentType::Phq9];
        assert_eq!(entry.average_score, 10.13);
    }

    #[test]
    fn thirds_round_to_two_places() {
        let records = vec![
            record("a-1", AssessmentType::Phq9, 5, at(9)),
            record("a-2", AssessmentType::Phq9, 5, at(10)),
            record("a-3", AssessmentType::Phq9, 6, at(11)),
        ];

        let entry = &summarize(&records)[&AssessmentType::Phq9];
        assert_eq!(entry.average_score, 5.33);
    }
}
