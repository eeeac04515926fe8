use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Course, CourseFields, CourseWithOwner, NewUser, User};

/// Credential lookups and user creation
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive match on `email_address`
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
}

/// Course persistence. Read methods return the owner alongside the course.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, DatabaseError>;

    async fn find_course(&self, id: i64) -> Result<Option<CourseWithOwner>, DatabaseError>;

    async fn create_course(&self, owner_id: i64, fields: CourseFields) -> Result<Course, DatabaseError>;

    /// Returns `None` when no course has this id
    async fn update_course(&self, id: i64, fields: CourseFields) -> Result<Option<Course>, DatabaseError>;

    /// Returns `false` when no course has this id
    async fn delete_course(&self, id: i64) -> Result<bool, DatabaseError>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait]
pub trait Store: UserStore + CourseStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
