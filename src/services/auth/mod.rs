pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod permissions;
pub mod remote_jwks;
pub mod verifier;

pub use authorizer::Authorizer;
pub use claims::{Audience, Claims};
pub use error::{AuthError, AuthErrorKind};
pub use factory::build_authorizer;
pub use jwks::{JwksError, KeyResolver, StaticKeySet, VerificationKey};
pub use remote_jwks::{RemoteJwks, RemoteJwksSettings};
pub use verifier::{TokenPolicy, TokenVerifier};
