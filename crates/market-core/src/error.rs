use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A snapshot the analysis depends on is absent.
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// Unexpected failure while evaluating rules.
    #[error("Computation fault: {0}")]
    ComputationFault(String),

    /// The caller violated an input contract (e.g. a non-positive price).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub fn missing(what: impl Into<String>) -> Self {
        EngineError::MissingPrerequisite(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        EngineError::InvalidArgument(what.into())
    }

    pub fn fault(what: impl Into<String>) -> Self {
        EngineError::ComputationFault(what.into())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
