use rocket::{http::Status, response::Responder};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable error conditions reported to API callers.
/// A failed operation always leaves prior state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown candidate '{0}'")]
    UnknownCandidate(String),
    #[error("User '{user_id}' has already voted on candidate '{candidate_id}'")]
    DuplicateVote {
        user_id: String,
        candidate_id: String,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        warn!("{self}");
        Err(match self {
            Self::NotFound(_) => Status::NotFound,
            Self::InvalidInput(_) => Status::BadRequest,
            // A vote for a candidate outside the fixed set means the client
            // and server disagree about the candidate set.
            Self::UnknownCandidate(_) => Status::UnprocessableEntity,
            Self::DuplicateVote { .. } => Status::Conflict,
            Self::Conflict(_) => Status::Conflict,
        })
    }
}
