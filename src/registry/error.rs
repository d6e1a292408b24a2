use thiserror::Error;

/// Failure of a registry request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry is unable to understand and process the request (400)")]
    BadRequest,
    #[error("registry query limit exceeded (403)")]
    QueryLimitExceeded,
    #[error("registry found no objects (404)")]
    NotFound,
    #[error("registry integrity constraint violated (409)")]
    IntegrityViolation,
    #[error("registry internal server error (500)")]
    InternalServerError,
    #[error("unknown registry response ({0})")]
    Unknown(u16),
    /// Anything that went wrong below HTTP: DNS, TLS, connection, reading the body.
    #[error("failed to send registry request: {0}")]
    Transport(String),
}

impl RegistryError {
    /// Maps a non-success HTTP status to its error.
    pub fn from_status(status: u16) -> RegistryError {
        match status {
            400 => RegistryError::BadRequest,
            403 => RegistryError::QueryLimitExceeded,
            404 => RegistryError::NotFound,
            409 => RegistryError::IntegrityViolation,
            500 => RegistryError::InternalServerError,
            other => RegistryError::Unknown(other),
        }
    }

    /// HTTP status behind the error, if the registry answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::BadRequest => Some(400),
            RegistryError::QueryLimitExceeded => Some(403),
            RegistryError::NotFound => Some(404),
            RegistryError::IntegrityViolation => Some(409),
            RegistryError::InternalServerError => Some(500),
            RegistryError::Unknown(status) => Some(*status),
            RegistryError::Transport(_) => None,
        }
    }
}
