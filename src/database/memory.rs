use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{Course, CourseFields, CourseWithOwner, NewUser, User, UserProfile};
use super::store::{CourseStore, Store, UserStore};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    courses: BTreeMap<i64, Course>,
    next_user_id: i64,
    next_course_id: i64,
}

impl Tables {
    fn with_owner(&self, course: &Course) -> Result<CourseWithOwner, DatabaseError> {
        let owner = self.users.get(&course.user_id).ok_or_else(|| {
            DatabaseError::QueryError(format!(
                "course {} references missing user {}",
                course.id, course.user_id
            ))
        })?;
        Ok(CourseWithOwner {
            course: course.clone(),
            owner: UserProfile::from(owner),
        })
    }
}

/// Process-local store used when no `DATABASE_URL` is configured and by the
/// test suites. Ids are assigned sequentially from 1, like `BIGSERIAL`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email_address == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email_address == user.email_address)
        {
            return Err(DatabaseError::Conflict(
                "Email address is already in use".to_string(),
            ));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let stored = User {
            id: tables.next_user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email_address: user.email_address,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .courses
            .values()
            .map(|c| tables.with_owner(c))
            .collect()
    }

    async fn find_course(&self, id: i64) -> Result<Option<CourseWithOwner>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .courses
            .get(&id)
            .map(|c| tables.with_owner(c))
            .transpose()
    }

    async fn create_course(&self, owner_id: i64, fields: CourseFields) -> Result<Course, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(DatabaseError::QueryError(format!(
                "owner {} does not exist",
                owner_id
            )));
        }

        tables.next_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: tables.next_course_id,
            title: fields.title,
            description: fields.description,
            estimated_time: fields.estimated_time,
            materials_needed: fields.materials_needed,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update_course(&self, id: i64, fields: CourseFields) -> Result<Option<Course>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.courses.get_mut(&id).map(|course| {
            course.title = fields.title;
            course.description = fields.description;
            course.estimated_time = fields.estimated_time;
            course.materials_needed = fields.materials_needed;
            course.updated_at = Utc::now();
            course.clone()
        }))
    }

    async fn delete_course(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.courses.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
