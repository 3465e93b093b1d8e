use thiserror::Error;

use crate::profile::ProfileError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Email already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Not signed in")]
    NotSignedIn,

    /// The session is valid but no profile could be loaded or created.
    /// The bridge signs out when this happens.
    #[error("Could not set up profile: {0}")]
    ProfileBootstrap(String),

    #[error("Auth backend error: {0}")]
    Backend(String),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
