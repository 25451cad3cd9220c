/*
 * Responsibility
 * - Authorization checks shared by handlers
 *   - authenticated?  -> 401 "Not Authenticated"
 *   - owner?          -> 403 "Not Authorized"
 * - Existence is the caller's job and must be settled before require_owner
 */
use uuid::Uuid;

use crate::api::v1::extractors::IdentityContext;
use crate::error::AppError;

/// Returns the acting subject, or 401.
pub fn require_authenticated(identity: &IdentityContext) -> Result<Uuid, AppError> {
    identity.subject_id().ok_or_else(AppError::not_authenticated)
}

/// The resource must belong to the acting subject, else 403.
pub fn require_owner(identity: &IdentityContext, owner_id: Uuid) -> Result<(), AppError> {
    match identity.subject_id() {
        Some(subject_id) if subject_id == owner_id => Ok(()),
        Some(_) => Err(AppError::not_authorized()),
        None => Err(AppError::not_authenticated()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_is_not_authenticated() {
        let err = require_authenticated(&IdentityContext::anonymous()).unwrap_err();
        assert_eq!(err.code(), 401);
        assert_eq!(err.to_string(), "Not Authenticated");
    }

    #[test]
    fn authenticated_yields_subject() {
        let subject = Uuid::new_v4();
        let identity = IdentityContext::authenticated(subject);
        assert_eq!(require_authenticated(&identity).unwrap(), subject);
    }

    #[test]
    fn only_the_owner_passes() {
        let owner = Uuid::new_v4();

        assert!(require_owner(&IdentityContext::authenticated(owner), owner).is_ok());

        let err = require_owner(&IdentityContext::authenticated(Uuid::new_v4()), owner)
            .unwrap_err();
        assert_eq!(err.code(), 403);
        assert_eq!(err.to_string(), "Not Authorized");

        let err = require_owner(&IdentityContext::anonymous(), owner).unwrap_err();
        assert_eq!(err.code(), 401);
    }
}
