/// Validation failures at the admission boundary.
/// Non-fatal: a rejected admission mutates nothing and consumes no sequence.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdmitError {
    #[error("patient name must not be empty")]
    EmptyName,

    #[error("severity {0} is outside the triage scale (1-4)")]
    SeverityOutOfRange(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(AdmitError::EmptyName.to_string(), "patient name must not be empty");
        assert_eq!(
            AdmitError::SeverityOutOfRange(99).to_string(),
            "severity 99 is outside the triage scale (1-4)"
        );
    }
}
