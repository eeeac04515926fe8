use thiserror::Error;

use super::gate::AuthenticatedContext;
use crate::database::models::{Course, CourseWithOwner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthzFailure {
    #[error("resource not found")]
    NotFound,
    #[error("authenticated user does not own the resource")]
    Forbidden,
}

/// A resource that belongs to exactly one user
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Course {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl Owned for CourseWithOwner {
    fn owner_id(&self) -> i64 {
        self.course.user_id
    }
}

/// Permit a mutation only when the resource exists and belongs to the
/// authenticated identity. Existence is checked first.
pub fn authorize<'a, R: Owned>(
    context: &AuthenticatedContext,
    resource: Option<&'a R>,
) -> Result<&'a R, AuthzFailure> {
    let resource = resource.ok_or(AuthzFailure::NotFound)?;
    if resource.owner_id() != context.identity.id {
        return Err(AuthzFailure::Forbidden);
    }
    Ok(resource)
}
