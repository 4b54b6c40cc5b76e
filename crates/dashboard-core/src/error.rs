use thiserror::Error;

use crate::types::DashboardSection;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Ticker must not be empty")]
    InvalidTicker,

    /// One backend call failed; the whole aggregate load is discarded.
    #[error("{section} API failed")]
    SectionFailed {
        section: DashboardSection,
        reason: String,
    },

    #[error("Load for {0} was superseded by a newer navigation")]
    Superseded(String),
}

impl DashboardError {
    pub fn section_failed(section: DashboardSection, reason: impl Into<String>) -> Self {
        DashboardError::SectionFailed {
            section,
            reason: reason.into(),
        }
    }

    /// The section that failed, if this error came from a backend call.
    pub fn section(&self) -> Option<DashboardSection> {
        match self {
            DashboardError::SectionFailed { section, .. } => Some(*section),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_failure_message() {
        let err = DashboardError::section_failed(DashboardSection::Reddit, "HTTP 500");
        assert_eq!(err.to_string(), "Reddit API failed");
        assert_eq!(err.section(), Some(DashboardSection::Reddit));
    }

    #[test]
    fn test_every_section_has_a_named_failure() {
        let messages: Vec<String> = DashboardSection::ALL
            .iter()
            .map(|s| DashboardError::section_failed(*s, "boom").to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Price API failed",
                "News API failed",
                "Reddit API failed",
                "Financials API failed",
            ]
        );
    }
}
