use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Reference Data ---

/// Role
///
/// Pre-existing reference data (`Instructor`, `Student`, ...) seeded by migration.
/// Looked up by exact name at registration time, never created through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Category
///
/// Name-keyed reference entity. Courses point at one by name on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// UploadFile
///
/// A registered upload. `name` is the client's original filename and is what a course's
/// `thumbnail` field refers to; `key` is the object key inside the storage bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct UploadFile {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub mime: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new `UploadFile`.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub key: String,
    pub mime: String,
}

// --- Users ---

/// StoredUser
///
/// Raw `users` row, including the password hash. Internal only: it is deliberately not
/// `Serialize`, so it can never end up in a response body.
#[derive(Debug, Clone, FromRow)]
pub struct StoredUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub provider: String,
    pub confirmed: bool,
    pub password_hash: String,
    pub role_id: Option<Uuid>,
}

/// Insert payload for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub provider: String,
    pub confirmed: bool,
    pub role_id: Uuid,
}

/// User
///
/// Sanitized projection returned by register and login: every column except the password,
/// with the role relation populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub provider: String,
    pub confirmed: bool,
    pub role: Option<Role>,
}

impl User {
    pub fn from_stored(stored: StoredUser, role: Option<Role>) -> Self {
        Self {
            id: stored.id,
            username: stored.username,
            email: stored.email,
            provider: stored.provider,
            confirmed: stored.confirmed,
            role,
        }
    }
}

/// UserProfile
///
/// The narrower projection served by `GET /users/me` and `GET /users`, and embedded as a
/// course's instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

// --- Courses ---

/// PublishedStatus
///
/// Mapped to the Postgres `published_status` enum. Anything that is not exactly
/// `draft` or `published` falls back to `draft` (see [`PublishedStatus::from_input`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "published_status", rename_all = "lowercase")]
pub enum PublishedStatus {
    #[default]
    Draft,
    Published,
}

impl PublishedStatus {
    /// Whitelists raw client input. Missing, non-string or unknown values become `Draft`.
    pub fn from_input(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("published") => PublishedStatus::Published,
            _ => PublishedStatus::Draft,
        }
    }
}

/// Course
///
/// A course with its relations populated, as returned by every course endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub published_status: PublishedStatus,
    pub thumbnail: Option<UploadFile>,
    pub category: Option<Category>,
    pub instructor: Option<UserProfile>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CourseRow
///
/// Raw `courses` row with relation ids, before population.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub published_status: PublishedStatus,
    pub thumbnail_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a validated course. `instructor_id` always comes from the caller.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: i32,
    pub published_status: PublishedStatus,
    pub thumbnail_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub instructor_id: Uuid,
}

/// CourseChanges
///
/// Validated partial update. For the relations, `Some(None)` clears the link and `None`
/// leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub published_status: Option<PublishedStatus>,
    pub thumbnail_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Body of `POST /auth/local/register`. Every field is optional at the wire level so a
/// missing field becomes a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "Instructor")]
    pub role: Option<String>,
}

/// LoginRequest
///
/// Body of `POST /auth/local`. `identifier` matches either the email or the username.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// CourseInput
///
/// The `data` object of course create/update bodies. `price` and `published_status` stay
/// loosely typed because clients send numbers, numeric strings and arbitrary statuses;
/// they are coerced by the course handlers. Unknown keys such as `instructor` are ignored.
///
/// Every field except `title` and `description` keeps an explicit `null` apart from an
/// absent key, so an update can reset a field to its default.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    // Filename of an uploaded file. `null` or "" detaches the thumbnail.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    #[schema(value_type = Option<String>)]
    pub thumbnail: Option<Option<String>>,
    // Number or numeric string. `null` means 0.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | string | null")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<Value>>,
    // Category name. `null` or "" detaches the category.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    // Anything but "published" (including `null`) means draft.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    #[schema(value_type = Option<String>, example = "draft")]
    pub published_status: Option<Option<Value>>,
}

/// CourseRequest
///
/// Envelope for `POST /courses` and `PUT /courses/{id}`: `{ "data": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CourseRequest {
    pub data: Option<CourseInput>,
}

/// PresignedUrlRequest
///
/// Input payload for registering a thumbnail upload (POST /upload/presigned).
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct PresignedUrlRequest {
    /// Original filename. Becomes the file's `name`, which courses reference as `thumbnail`.
    #[schema(example = "intro-cover.png")]
    pub filename: String,
    /// MIME type the upload is constrained to.
    #[schema(example = "image/png")]
    pub file_type: String,
}

// --- Response Payloads (Output Schemas) ---

/// AuthResponse
///
/// `201` body of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: User,
}

/// LoginResponse
///
/// `200` body of a successful login; `role` repeats the role name for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub jwt: String,
    pub user: User,
    pub role: Option<String>,
}

/// CourseCreatedResponse
///
/// Returned by `POST /courses`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CourseCreatedResponse {
    #[schema(example = "Course created successfully")]
    pub message: String,
    // The stored course with instructor, category and thumbnail populated.
    pub course: Course,
}

/// InstructorCoursesResponse
///
/// Returned by `GET /instructor/courses`. Never empty: no courses is a 404 instead.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct InstructorCoursesResponse {
    pub courses: Vec<Course>,
}

/// CourseData
///
/// Single-course envelope for `GET`, `PUT` and `DELETE /courses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CourseData {
    pub data: Course,
}

/// CourseListData
///
/// Envelope for `GET /courses`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CourseListData {
    pub data: Vec<Course>,
}

/// CategoryListData
///
/// Envelope for `GET /categories`, ordered by name.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CategoryListData {
    pub data: Vec<Category>,
}

/// PresignedUrlResponse
///
/// The time-limited upload URL plus the file record the thumbnail can now be referenced by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PresignedUrlResponse {
    pub upload_url: String,
    pub resource_key: String,
    pub file: UploadFile,
}
