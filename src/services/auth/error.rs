//! Authorization failures.
//!
//! Every internal cause has its own variant so callers and tests can tell them
//! apart. The outward projection is `(kind, status, message)`; the `Display`
//! text is for logs only and never reaches the client.

use axum::http::StatusCode;
use thiserror::Error;

use super::jwks::JwksError;

/// Stable, client-visible failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidHeader,
    InvalidClaims,
    TokenExpired,
    Unauthorized,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidHeader => "invalid_header",
            Self::InvalidClaims => "invalid_claims",
            Self::TokenExpired => "token_expired",
            Self::Unauthorized => "unauthorized",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingHeader,

    #[error("authorization header is malformed")]
    MalformedHeader,

    #[error("token is malformed: {0}")]
    MalformedToken(String),

    #[error("token algorithm {0} is not allowed")]
    DisallowedAlgorithm(String),

    #[error("token header has no 'kid'")]
    MissingKeyId,

    #[error(transparent)]
    KeyResolution(#[from] JwksError),

    #[error("signing key algorithm does not match token algorithm")]
    KeyAlgorithmMismatch,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("incorrect claims: {0}")]
    ClaimsMismatch(String),

    #[error("claims payload has an unexpected shape: {0}")]
    MalformedClaims(String),

    #[error("'permissions' claim is missing")]
    PermissionsMissing,

    #[error("permission '{0}' not granted")]
    PermissionDenied(String),
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MissingHeader
            | Self::MalformedHeader
            | Self::MalformedToken(_)
            | Self::DisallowedAlgorithm(_)
            | Self::MissingKeyId
            | Self::KeyResolution(_)
            | Self::KeyAlgorithmMismatch
            | Self::InvalidSignature => AuthErrorKind::InvalidHeader,
            Self::Expired => AuthErrorKind::TokenExpired,
            Self::ClaimsMismatch(_) | Self::MalformedClaims(_) | Self::PermissionsMissing => {
                AuthErrorKind::InvalidClaims
            }
            Self::PermissionDenied(_) => AuthErrorKind::Unauthorized,
        }
    }

    /// Shape problems in a token whose signature checked out are 400; content
    /// mismatches and unverifiable credentials are 401; missing grants are 403.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedClaims(_) | Self::PermissionsMissing => StatusCode::BAD_REQUEST,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind().as_str()
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                Self::DisallowedAlgorithm(e.to_string())
            }
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidIssuer => Self::ClaimsMismatch("issuer".to_string()),
            ErrorKind::InvalidAudience => Self::ClaimsMismatch("audience".to_string()),
            ErrorKind::InvalidSubject => Self::ClaimsMismatch("subject".to_string()),
            ErrorKind::ImmatureSignature => Self::ClaimsMismatch("nbf".to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                Self::ClaimsMismatch(format!("missing '{claim}'"))
            }
            // Payload decoding runs after the signature check.
            ErrorKind::Json(inner) => Self::MalformedClaims(inner.to_string()),
            _ => Self::MalformedToken(e.to_string()),
        }
    }
}
