use thiserror::Error;
use super::identity::IdentityRef;
use super::user::UserId;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    // Behavioral parameters must be probabilities.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("a user needs at least one identity")]
    NoIdentities,

    #[error("no user with id {0}")]
    UnknownUser(UserId),

    #[error("no identity {0}")]
    UnknownIdentity(IdentityRef),

    // Rating or voting on a video the identity never uploaded.
    #[error("identity {owner} has no upload named {video:?}")]
    MissingUpload { owner: IdentityRef, video: String },
}

pub type SimResult<T> = Result<T, SimError>;
