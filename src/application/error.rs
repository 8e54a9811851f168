use std::error::Error as StdError;

use thiserror::Error;

use crate::{application::campaigns::CampaignError, infra::error::InfraError};

/// Flattened error chain suitable for a single structured log event.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Campaign(#[from] CampaignError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit code reported by the operator binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Campaign(CampaignError::Validation(_))
            | AppError::Campaign(CampaignError::NotFound) => 2,
            AppError::Infra(InfraError::Configuration { .. }) => 78,
            AppError::Infra(InfraError::Database { .. })
            | AppError::Infra(InfraError::Cache { .. })
            | AppError::Campaign(CampaignError::Timeout { .. }) => 69,
            _ => 1,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let io = std::io::Error::other("disk gone");
        let err = AppError::from(InfraError::from(io));
        let report = err.report();
        assert_eq!(report.messages[0], "io error: disk gone");
        assert_eq!(report.summary(), report.messages.join(": "));
    }

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(AppError::from(CampaignError::NotFound).exit_code(), 2);
        assert_eq!(
            AppError::from(InfraError::configuration("bad")).exit_code(),
            78
        );
        assert_eq!(AppError::from(InfraError::database("down")).exit_code(), 69);
        assert_eq!(AppError::unexpected("?").exit_code(), 1);
    }
}
