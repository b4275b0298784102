use thiserror::Error;

/// Data dependency that an action requires before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    NoDataset,
    NoModel,
}

impl Precondition {
    /// Notice shown to the user instead of issuing a request.
    pub fn notice(&self) -> &'static str {
        match self {
            Precondition::NoDataset => "Please upload a file first",
            Precondition::NoModel => "Please train a model first",
        }
    }
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precondition::NoDataset => write!(f, "no dataset"),
            Precondition::NoModel => write!(f, "no model"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudioError {
    #[error("Precondition failed: {0}")]
    Precondition(Precondition),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StudioResult<T> = std::result::Result<T, StudioError>;

impl StudioError {
    /// Errors raised before any request leaves the client.
    pub fn is_local(&self) -> bool {
        matches!(self, StudioError::Precondition(_) | StudioError::Validation(_))
    }

    /// Message suitable for a status region or a blocking notice.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Precondition(p) => p.notice().to_string(),
            StudioError::Validation(msg)
            | StudioError::Transport(msg)
            | StudioError::Backend(msg) => msg.clone(),
        }
    }
}

impl From<validator::ValidationErrors> for StudioError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{}: {}", field, detail)
            })
            .collect();
        messages.sort();
        StudioError::Validation(messages.join(", "))
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::Backend(format!("unexpected response payload: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_messages() {
        let err = StudioError::Precondition(Precondition::NoDataset);
        assert_eq!(err.to_string(), "Precondition failed: no dataset");
        assert_eq!(err.user_message(), "Please upload a file first");

        let err = StudioError::Precondition(Precondition::NoModel);
        assert_eq!(err.to_string(), "Precondition failed: no model");
        assert!(err.is_local());
    }

    #[test]
    fn test_remote_errors_are_not_local() {
        assert!(!StudioError::Transport("down".into()).is_local());
        assert!(!StudioError::Backend("bad column".into()).is_local());
        assert_eq!(StudioError::Backend("bad column".into()).user_message(), "bad column");
    }
}
