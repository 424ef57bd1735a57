use super::claims::Claims;
use super::error::AuthError;

/// Exact, case-sensitive membership check against the `permissions` claim.
pub fn check_permission(claims: &Claims, required: &str) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::PermissionsMissing);
    }

    if claims.has_permission(required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied(required.to_string()))
    }
}
