/*
 * Responsibility
 * - The per-request identity seen by handlers
 * - Built once by middleware::auth::identity, then only read
 *
 * Notes
 * - No public constructor takes both a subject and a flag: "authenticated"
 *   is exactly "has a subject"
 */
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityContext {
    subject_id: Option<Uuid>,
}

impl IdentityContext {
    pub fn anonymous() -> Self {
        Self { subject_id: None }
    }

    pub fn authenticated(subject_id: Uuid) -> Self {
        Self {
            subject_id: Some(subject_id),
        }
    }

    pub fn subject_id(&self) -> Option<Uuid> {
        self.subject_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject_id.is_some()
    }
}
