use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Scoring table error: {0}")]
    ScoringTable(String),

    #[error("Question bank error: {0}")]
    QuestionBank(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Invalid answer for {question_id}: {reason}")]
    InvalidAnswer { question_id: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Match {0} already has an action from this side")]
    AlreadyActed(String),

    #[error("No pending matches for {0}")]
    NoPendingMatches(String),

    #[error("No active roles for organization {0}")]
    NoActiveRoles(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_answer(question_id: &str, reason: impl Into<String>) -> Self {
        Error::InvalidAnswer {
            question_id: question_id.to_string(),
            reason: reason.into(),
        }
    }
}
