use crate::utils::error::{FailureKind, RefreshError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub const DEFAULT_START_TOKEN_ID: u64 = 1;
pub const DEFAULT_END_TOKEN_ID: u64 = 472;

/// Upper bound on outcome slots reserved up front; larger ranges grow as they go.
const MAX_PREALLOCATED_OUTCOMES: usize = 1024;

/// Closed interval of token identifiers, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenRange")]
pub struct TokenRange {
    start: u64,
    end: u64,
}

impl TokenRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        crate::utils::validation::validate_ordered("token_range", start, end)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// `0..=u64::MAX` holds one more ID than `u64` can count.
    pub fn len(&self) -> u128 {
        u128::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, token_id: u64) -> bool {
        self.ids().contains(&token_id)
    }

    pub fn ids(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

#[derive(Deserialize)]
struct RawTokenRange {
    start: u64,
    end: u64,
}

impl TryFrom<RawTokenRange> for TokenRange {
    type Error = RefreshError;

    fn try_from(raw: RawTokenRange) -> Result<Self> {
        TokenRange::new(raw.start, raw.end)
    }
}

impl Default for TokenRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_TOKEN_ID,
            end: DEFAULT_END_TOKEN_ID,
        }
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Refreshed {
        token_id: u64,
        payload: serde_json::Value,
    },
    Failed {
        token_id: u64,
        kind: FailureKind,
        reason: String,
    },
}

impl RefreshOutcome {
    pub fn from_result(token_id: u64, result: Result<serde_json::Value>) -> Self {
        match result {
            Ok(payload) => RefreshOutcome::Refreshed { token_id, payload },
            Err(e) => RefreshOutcome::failed(token_id, &e),
        }
    }

    pub fn failed(token_id: u64, error: &RefreshError) -> Self {
        RefreshOutcome::Failed {
            token_id,
            kind: error.failure_kind(),
            reason: error.to_string(),
        }
    }

    pub fn token_id(&self) -> u64 {
        match self {
            RefreshOutcome::Refreshed { token_id, .. } | RefreshOutcome::Failed { token_id, .. } => {
                *token_id
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed { .. })
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Refreshed { token_id, payload } => {
                write!(f, "Data for token ID {}: {}", token_id, payload)
            }
            RefreshOutcome::Failed {
                token_id, reason, ..
            } => write!(f, "Error fetching data for token ID {}: {}", token_id, reason),
        }
    }
}

/// Outcomes of one pass over a token range, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub contract_address: String,
    pub range: TokenRange,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<RefreshOutcome>,
}

impl RefreshReport {
    pub fn new(contract_address: impl Into<String>, range: TokenRange) -> Self {
        Self {
            contract_address: contract_address.into(),
            range,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::with_capacity(
                usize::try_from(range.len())
                    .unwrap_or(usize::MAX)
                    .min(MAX_PREALLOCATED_OUTCOMES),
            ),
        }
    }

    pub fn record(&mut self, outcome: RefreshOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failed_token_ids(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(RefreshOutcome::token_id)
            .collect()
    }

    pub fn outcome(&self, token_id: u64) -> Option<&RefreshOutcome> {
        self.outcomes.iter().find(|o| o.token_id() == token_id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_collection_range() {
        let range = TokenRange::default();
        assert_eq!(range.start(), 1);
        assert_eq!(range.end(), 472);
        assert_eq!(range.len(), 472);
        assert_eq!(range.ids().count(), 472);
        assert!(range.contains(472));
        assert!(!range.contains(0));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(TokenRange::new(5, 4).is_err());
        let single = TokenRange::new(9, 9).unwrap();
        assert_eq!(single.ids().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_full_u64_range_length() {
        let range = TokenRange::new(0, u64::MAX).unwrap();
        assert_eq!(range.len(), u128::from(u64::MAX) + 1);
        assert!(range.contains(u64::MAX));
    }

    #[test]
    fn test_huge_range_report_reserves_bounded_capacity() {
        let huge = TokenRange::new(1, 100_000_000_000).unwrap();
        let report = RefreshReport::new("0xabc", huge);
        assert!(report.outcomes.capacity() <= MAX_PREALLOCATED_OUTCOMES);

        let full = RefreshReport::new("0xabc", TokenRange::new(0, u64::MAX).unwrap());
        assert!(full.outcomes.capacity() <= MAX_PREALLOCATED_OUTCOMES);
        assert_eq!(full.total(), 0);
    }

    #[test]
    fn test_deserialized_range_is_validated() {
        let ok: TokenRange = serde_json::from_str(r#"{"start": 3, "end": 5}"#).unwrap();
        assert_eq!(ok, TokenRange::new(3, 5).unwrap());

        let inverted = serde_json::from_str::<TokenRange>(r#"{"start": 5, "end": 3}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_outcome_lines() {
        let ok = RefreshOutcome::Refreshed {
            token_id: 5,
            payload: serde_json::json!({"token_id": "5"}),
        };
        assert_eq!(ok.to_string(), r#"Data for token ID 5: {"token_id":"5"}"#);

        let err = RefreshError::Status {
            code: 404,
            status_text: "Not Found".to_string(),
        };
        let failed = RefreshOutcome::failed(10, &err);
        assert_eq!(failed.to_string(), "Error fetching data for token ID 10: Not Found");
    }

    #[test]
    fn test_report_tallies() {
        let mut report = RefreshReport::new("0xabc", TokenRange::new(1, 3).unwrap());
        report.record(RefreshOutcome::Refreshed {
            token_id: 1,
            payload: serde_json::json!({}),
        });
        report.record(RefreshOutcome::failed(
            2,
            &RefreshError::Connection {
                message: "reset".to_string(),
            },
        ));
        report.record(RefreshOutcome::Refreshed {
            token_id: 3,
            payload: serde_json::json!({}),
        });
        report.finish();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_token_ids(), vec![2]);
        assert!(report.outcome(3).unwrap().is_success());
        assert!(report.finished_at.is_some());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["outcomes"][1]["status"], "failed");
        assert_eq!(json["outcomes"][1]["kind"], "transport");
    }
}
