use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AdmitError;

/// Triage severity class. Lower is more urgent; 1 is the single source of
/// truth for "critical": display labels and critical counts both derive
/// from this enum, nothing else hard-codes the threshold.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Critical = 1,
    High = 2,
    Medium = 3,
    Low = 4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Registration label, matching the intake form wording.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical (Life Threatening)",
            Self::High => "High (Severe Injury)",
            Self::Medium => "Medium (Flu/Fever)",
            Self::Low => "Low (Checkup)",
        }
    }

    pub fn is_critical(self) -> bool {
        self == Self::Critical
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = AdmitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Critical),
            2 => Ok(Self::High),
            3 => Ok(Self::Medium),
            4 => Ok(Self::Low),
            other => Err(AdmitError::SeverityOutOfRange(other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.as_u8(), self.label())
    }
}

/// One waiting entrant. Immutable once constructed; treating a patient
/// removes the record from the queue, it is never edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    pub name: String,
    pub severity: Severity,
    /// Unique, strictly increasing token assigned at admission time.
    pub arrival: u64,
    pub condition: String,
}

impl AdmissionRecord {
    /// Construct a record, rejecting blank names. The arrival token must
    /// come from the process's `SequenceAllocator` so FCFS tie-breaking
    /// stays well-defined.
    pub fn new(
        name: impl Into<String>,
        severity: Severity,
        arrival: u64,
        condition: impl Into<String>,
    ) -> Result<Self, AdmitError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AdmitError::EmptyName);
        }
        Ok(Self {
            name,
            severity,
            arrival,
            condition: condition.into(),
        })
    }
}

/// The ordering rule: severity ascending, then arrival ascending. Name and
/// condition stay opaque to ordering.
///
/// Consistency with `Eq` leans on the allocator invariant that arrival
/// tokens are unique within a queue: two distinct records never share a
/// token, so `cmp` never returns `Equal` for records that differ in name
/// or condition.
impl Ord for AdmissionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity
            .cmp(&other.severity)
            .then(self.arrival.cmp(&other.arrival))
    }
}

impl PartialOrd for AdmissionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, severity: Severity, arrival: u64) -> AdmissionRecord {
        AdmissionRecord::new(name, severity, arrival, severity.label()).unwrap()
    }

    #[test]
    fn severity_from_u8_roundtrip() {
        for severity in Severity::ALL {
            let raw = severity.as_u8();
            assert_eq!(Severity::try_from(raw).unwrap(), severity);
        }
    }

    #[test]
    fn severity_out_of_range_rejected() {
        assert_eq!(Severity::try_from(0), Err(AdmitError::SeverityOutOfRange(0)));
        assert_eq!(Severity::try_from(5), Err(AdmitError::SeverityOutOfRange(5)));
        assert_eq!(Severity::try_from(99), Err(AdmitError::SeverityOutOfRange(99)));
    }

    #[test]
    fn only_severity_one_is_critical() {
        assert!(Severity::Critical.is_critical());
        for severity in [Severity::High, Severity::Medium, Severity::Low] {
            assert!(!severity.is_critical());
        }
    }

    #[test]
    fn severity_serializes_as_number() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "2");
        let parsed: Severity = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn severity_bad_number_fails_deserialization() {
        let result: Result<Severity, _> = serde_json::from_str("7");
        assert!(result.is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let result = AdmissionRecord::new("", Severity::Medium, 1, "flu");
        assert_eq!(result, Err(AdmitError::EmptyName));
        let result = AdmissionRecord::new("   ", Severity::Medium, 1, "flu");
        assert_eq!(result, Err(AdmitError::EmptyName));
    }

    #[test]
    fn lower_severity_orders_first() {
        let high = record("Bob", Severity::High, 5);
        let low = record("Alice", Severity::Low, 1);
        assert!(high < low);
    }

    #[test]
    fn same_severity_orders_by_arrival() {
        let first = record("Bob", Severity::Critical, 2);
        let second = record("Cara", Severity::Critical, 3);
        assert!(first < second);
    }

    #[test]
    fn name_and_condition_are_opaque_to_ordering() {
        let a = record("Zed", Severity::High, 1);
        let b = record("Amy", Severity::High, 2);
        assert!(a < b);
    }

    #[test]
    fn distinct_arrivals_never_compare_equal() {
        let a = record("Alice", Severity::High, 1);
        let b = record("Alice", Severity::High, 2);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, b);
    }

    #[test]
    fn record_serde_roundtrip() {
        let original = record("Alice", Severity::Medium, 42);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: AdmissionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
