use crate::models::{
    Category, Course, CourseChanges, CourseRow, NewCourse, NewFile, NewUser, Role, StoredUser,
    UploadFile, User, UserProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// RepositoryError
///
/// Failures surfaced by the entity store. Only `Conflict` is meaningful to clients;
/// everything else becomes an internal error at the handler boundary.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write. Carries the client-facing message.
    #[error("{0}")]
    Conflict(String),
    /// A foreign key pointed at a record that does not exist.
    #[error("referenced record does not exist")]
    MissingRelation,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository Trait
///
/// The entity store contract: filtered find, find-one-by-id, create, update and delete per
/// content type, with relations populated on the way out. Handlers only ever see this
/// trait, so Postgres and the in-memory store are interchangeable.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Roles ---
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError>;
    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, RepositoryError>;

    // --- Users ---
    // Uniqueness of email and username is enforced here, not by the caller.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    // Exact match on email OR username. Returns the row with its password hash.
    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, RepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    // --- Categories ---
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError>;
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    // --- Files ---
    async fn find_file_by_name(&self, name: &str) -> Result<Option<UploadFile>, RepositoryError>;
    async fn create_file(&self, file: NewFile) -> Result<UploadFile, RepositoryError>;

    // --- Courses (returned with thumbnail, category and instructor populated) ---
    async fn create_course(&self, course: NewCourse) -> Result<Course, RepositoryError>;
    async fn get_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError>;
    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError>;
    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>, RepositoryError>;
    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<Option<Course>, RepositoryError>;
    // Returns the removed course, or None if it did not exist.
    async fn delete_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.provider, u.confirmed, \
     r.id AS role_id, r.name AS role_name, r.description AS role_description";

const COURSE_COLUMNS: &str = "id, title, description, price, published_status, \
     thumbnail_id, category_id, instructor_id, created_at, updated_at";

/// A `users` row joined with its role.
#[derive(FromRow)]
struct UserWithRoleRow {
    id: Uuid,
    username: String,
    email: String,
    provider: String,
    confirmed: bool,
    role_id: Option<Uuid>,
    role_name: Option<String>,
    role_description: Option<String>,
}

impl From<UserWithRoleRow> for User {
    fn from(row: UserWithRoleRow) -> Self {
        let role = match (row.role_id, row.role_name) {
            (Some(id), Some(name)) => Some(Role {
                id,
                name,
                description: row.role_description,
            }),
            _ => None,
        };
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            provider: row.provider,
            confirmed: row.confirmed,
            role,
        }
    }
}

/// Translates constraint violations into domain errors.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some("users_username_key") => "Username already taken",
                _ => "Email already taken",
            };
            return RepositoryError::Conflict(message.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::MissingRelation;
        }
    }
    RepositoryError::Database(err)
}

/// PostgresRepository
///
/// The production implementation of `Repository`, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled migrations (schema, enum type and reference data).
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// populate
    ///
    /// Resolves a raw course row's thumbnail, category and instructor relations.
    async fn populate(&self, row: CourseRow) -> Result<Course, RepositoryError> {
        let thumbnail = match row.thumbnail_id {
            Some(id) => {
                sqlx::query_as::<_, UploadFile>(
                    "SELECT id, name, key, mime, created_at FROM files WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };
        let category = match row.category_id {
            Some(id) => {
                sqlx::query_as::<_, Category>(
                    "SELECT id, name, description FROM categories WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => None,
        };
        let instructor = self.get_user(row.instructor_id).await?.map(UserProfile::from);

        Ok(Course {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            published_status: row.published_status,
            thumbnail,
            category,
            instructor,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn populate_all(&self, rows: Vec<CourseRow>) -> Result<Vec<Course>, RepositoryError> {
        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            courses.push(self.populate(row).await?);
        }
        Ok(courses)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, description FROM roles WHERE name = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, RepositoryError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    /// create_user
    ///
    /// Email is checked first inside the transaction so a registration that collides on
    /// both email and username reports the email, as the in-memory store does. The
    /// `users_email_key` / `users_username_key` unique constraints still decide races
    /// between concurrent registrations.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&user.email)
                .fetch_one(&mut *tx)
                .await?;
        if email_taken {
            return Err(RepositoryError::Conflict("Email already taken".to_string()));
        }

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO users (id, username, email, password_hash, provider, confirmed, role_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id"#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.provider)
        .bind(user.confirmed)
        .bind(user.role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        self.get_user(id)
            .await?
            .ok_or(RepositoryError::Database(sqlx::Error::RowNotFound))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithRoleRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, RepositoryError> {
        let user = sqlx::query_as::<_, StoredUser>(
            r#"SELECT id, username, email, provider, confirmed, password_hash, role_id
               FROM users
               WHERE email = $1 OR username = $1
               ORDER BY created_at ASC
               LIMIT 1"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserWithRoleRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u LEFT JOIN roles r ON r.id = u.role_id ORDER BY u.created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE name = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_file_by_name(&self, name: &str) -> Result<Option<UploadFile>, RepositoryError> {
        // Several uploads may share a filename; the most recent one wins.
        let file = sqlx::query_as::<_, UploadFile>(
            "SELECT id, name, key, mime, created_at FROM files WHERE name = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(file)
    }

    async fn create_file(&self, file: NewFile) -> Result<UploadFile, RepositoryError> {
        let created = sqlx::query_as::<_, UploadFile>(
            r#"INSERT INTO files (id, name, key, mime)
               VALUES ($1, $2, $3, $4)
               RETURNING id, name, key, mime, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(&file.name)
        .bind(&file.key)
        .bind(&file.mime)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(created)
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course, RepositoryError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            r#"INSERT INTO courses
                   (id, title, description, price, published_status, thumbnail_id, category_id, instructor_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(Uuid::new_v4())
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.price)
        .bind(course.published_status)
        .bind(course.thumbnail_id)
        .bind(course.category_id)
        .bind(course.instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.populate(row).await
    }

    async fn get_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.populate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.populate_all(rows).await
    }

    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE instructor_id = $1 ORDER BY created_at DESC"
        ))
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?;
        self.populate_all(rows).await
    }

    /// update_course
    ///
    /// Builds the SET list from the provided fields only, using QueryBuilder for safe
    /// parameterization. `updated_at` is always bumped.
    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<Option<Course>, RepositoryError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE courses SET updated_at = now()");

        if let Some(title) = changes.title {
            builder.push(", title = ");
            builder.push_bind(title);
        }
        if let Some(description) = changes.description {
            builder.push(", description = ");
            builder.push_bind(description);
        }
        if let Some(price) = changes.price {
            builder.push(", price = ");
            builder.push_bind(price);
        }
        if let Some(status) = changes.published_status {
            builder.push(", published_status = ");
            builder.push_bind(status);
        }
        if let Some(thumbnail_id) = changes.thumbnail_id {
            builder.push(", thumbnail_id = ");
            builder.push_bind(thumbnail_id);
        }
        if let Some(category_id) = changes.category_id {
            builder.push(", category_id = ");
            builder.push_bind(category_id);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(format!(" RETURNING {COURSE_COLUMNS}"));

        let row = builder
            .build_query_as::<CourseRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        match row {
            Some(row) => Ok(Some(self.populate(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError> {
        let Some(course) = self.get_course(id).await? else {
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(course))
    }
}

// --- In-Memory Implementation ---

#[derive(Default)]
struct Tables {
    roles: Vec<Role>,
    users: Vec<StoredUser>,
    categories: Vec<Category>,
    files: Vec<UploadFile>,
    courses: Vec<CourseRow>,
}

impl Tables {
    fn role(&self, id: Option<Uuid>) -> Option<Role> {
        id.and_then(|id| self.roles.iter().find(|r| r.id == id).cloned())
    }

    fn user(&self, id: Uuid) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| User::from_stored(u.clone(), self.role(u.role_id)))
    }

    fn populate(&self, row: &CourseRow) -> Course {
        Course {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            price: row.price,
            published_status: row.published_status,
            thumbnail: row
                .thumbnail_id
                .and_then(|id| self.files.iter().find(|f| f.id == id).cloned()),
            category: row
                .category_id
                .and_then(|id| self.categories.iter().find(|c| c.id == id).cloned()),
            instructor: self.user(row.instructor_id).map(UserProfile::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn relations_exist(&self, thumbnail_id: Option<Uuid>, category_id: Option<Uuid>) -> bool {
        thumbnail_id.is_none_or(|id| self.files.iter().any(|f| f.id == id))
            && category_id.is_none_or(|id| self.categories.iter().any(|c| c.id == id))
    }
}

/// MemoryRepository
///
/// An in-process `Repository` used by the test suite and by local runs without
/// `DATABASE_URL`. All tables sit behind one lock, so the uniqueness check and the insert
/// in `create_user` happen atomically, mirroring the Postgres unique constraints.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the same reference data the migrations seed.
    pub fn seeded() -> Self {
        let roles = [
            ("Authenticated", "Default role given to authenticated user."),
            ("Public", "Default role given to unauthenticated user."),
            ("Instructor", "Creates and manages courses."),
            ("Student", "Enrolls in courses."),
        ]
        .into_iter()
        .map(|(name, description)| Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .collect();

        let categories = ["Business", "Data Science", "Design", "Programming"]
            .into_iter()
            .map(|name| Category {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: None,
            })
            .collect();

        Self {
            tables: RwLock::new(Tables {
                roles,
                categories,
                ..Tables::default()
            }),
        }
    }

    pub async fn insert_role(&self, name: &str) -> Role {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
        };
        self.tables.write().await.roles.push(role.clone());
        role
    }

    pub async fn insert_category(&self, name: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
        };
        self.tables.write().await.categories.push(category.clone());
        category
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, RepositoryError> {
        Ok(self.tables.read().await.role(Some(id)))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("Email already taken".to_string()));
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("Username already taken".to_string()));
        }
        if !tables.roles.iter().any(|r| r.id == user.role_id) {
            return Err(RepositoryError::MissingRelation);
        }

        let stored = StoredUser {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            provider: user.provider,
            confirmed: user.confirmed,
            password_hash: user.password_hash,
            role_id: Some(user.role_id),
        };
        let role = tables.role(stored.role_id);
        tables.users.push(stored.clone());
        Ok(User::from_stored(stored, role))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.user(id))
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredUser>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == identifier || u.username == identifier)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .map(|u| User::from_stored(u.clone(), tables.role(u.role_id)))
            .collect())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories = self.tables.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_file_by_name(&self, name: &str) -> Result<Option<UploadFile>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.files.iter().rev().find(|f| f.name == name).cloned())
    }

    async fn create_file(&self, file: NewFile) -> Result<UploadFile, RepositoryError> {
        let created = UploadFile {
            id: Uuid::new_v4(),
            name: file.name,
            key: file.key,
            mime: file.mime,
            created_at: Utc::now(),
        };
        self.tables.write().await.files.push(created.clone());
        Ok(created)
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.users.iter().any(|u| u.id == course.instructor_id)
            || !tables.relations_exist(course.thumbnail_id, course.category_id)
        {
            return Err(RepositoryError::MissingRelation);
        }

        let now = Utc::now();
        let row = CourseRow {
            id: Uuid::new_v4(),
            title: course.title,
            description: course.description,
            price: course.price,
            published_status: course.published_status,
            thumbnail_id: course.thumbnail_id,
            category_id: course.category_id,
            instructor_id: course.instructor_id,
            created_at: now,
            updated_at: now,
        };
        let populated = tables.populate(&row);
        tables.courses.push(row);
        Ok(populated)
    }

    async fn get_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .iter()
            .find(|c| c.id == id)
            .map(|row| tables.populate(row)))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .iter()
            .rev()
            .map(|row| tables.populate(row))
            .collect())
    }

    async fn list_courses_by_instructor(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .iter()
            .rev()
            .filter(|row| row.instructor_id == instructor_id)
            .map(|row| tables.populate(row))
            .collect())
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<Option<Course>, RepositoryError> {
        let mut tables = self.tables.write().await;

        let thumbnail_check = changes.thumbnail_id.flatten();
        let category_check = changes.category_id.flatten();
        if !tables.relations_exist(thumbnail_check, category_check) {
            return Err(RepositoryError::MissingRelation);
        }

        let Some(row) = tables.courses.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(price) = changes.price {
            row.price = price;
        }
        if let Some(status) = changes.published_status {
            row.published_status = status;
        }
        if let Some(thumbnail_id) = changes.thumbnail_id {
            row.thumbnail_id = thumbnail_id;
        }
        if let Some(category_id) = changes.category_id {
            row.category_id = category_id;
        }
        row.updated_at = Utc::now();

        let row = row.clone();
        Ok(Some(tables.populate(&row)))
    }

    async fn delete_course(&self, id: Uuid) -> Result<Option<Course>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.courses.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        let row = tables.courses.remove(index);
        Ok(Some(tables.populate(&row)))
    }
}
