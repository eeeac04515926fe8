use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Course, CourseFields, CourseWithOwner, NewUser, User, UserProfile};
use super::store::{CourseStore, Store, UserStore};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email_address, password, created_at, updated_at";

const COURSE_COLUMNS: &str = "id, title, description, estimated_time, materials_needed, \
     user_id, created_at, updated_at";

const COURSE_WITH_OWNER: &str = "SELECT c.id, c.title, c.description, c.estimated_time, \
     c.materials_needed, c.user_id, c.created_at, c.updated_at, \
     u.first_name AS owner_first_name, u.last_name AS owner_last_name, \
     u.email_address AS owner_email_address \
     FROM courses c JOIN users u ON u.id = c.user_id";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Flat row produced by the courses/users join
#[derive(Debug, FromRow)]
struct CourseRow {
    id: i64,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
}

impl From<CourseRow> for CourseWithOwner {
    fn from(row: CourseRow) -> Self {
        Self {
            owner: UserProfile {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
            course: Course {
                id: row.id,
                title: row.title,
                description: row.description,
                estimated_time: row.estimated_time,
                materials_needed: row.materials_needed,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email_address = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (first_name, last_name, email_address, password) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email_address)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Email address is already in use"))
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, DatabaseError> {
        let sql = format!("{COURSE_WITH_OWNER} ORDER BY c.id");
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CourseWithOwner::from).collect())
    }

    async fn find_course(&self, id: i64) -> Result<Option<CourseWithOwner>, DatabaseError> {
        let sql = format!("{COURSE_WITH_OWNER} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CourseWithOwner::from))
    }

    async fn create_course(&self, owner_id: i64, fields: CourseFields) -> Result<Course, DatabaseError> {
        let sql = format!(
            "INSERT INTO courses (title, description, estimated_time, materials_needed, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.estimated_time)
            .bind(&fields.materials_needed)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Course already exists"))
    }

    async fn update_course(&self, id: i64, fields: CourseFields) -> Result<Option<Course>, DatabaseError> {
        let sql = format!(
            "UPDATE courses SET title = $2, description = $3, estimated_time = $4, \
             materials_needed = $5, updated_at = now() WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.estimated_time)
            .bind(&fields.materials_needed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    async fn delete_course(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
