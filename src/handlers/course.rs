use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde_json::Value;
use uuid::Uuid;

use super::non_empty;
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorResponse},
    models::{
        CourseChanges, CourseCreatedResponse, CourseData, CourseListData, CourseRequest,
        InstructorCoursesResponse, NewCourse, PublishedStatus,
    },
};

/// parse_price
///
/// Coerces the raw `price` input into the stored integer. Absent or `null` is 0; numbers,
/// numeric strings (blank counts as 0) and booleans are accepted. The value is floored
/// before the sign check, so `-0.5` is rejected as negative.
pub fn parse_price(raw: Option<&Value>) -> Result<i32, ApiError> {
    let number = match raw {
        None | Some(Value::Null) => return Ok(0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => match s.trim() {
            "" => Some(0.0),
            trimmed => trimmed.parse::<f64>().ok(),
        },
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(_) => None,
    };

    let number = number
        .filter(|n| n.is_finite())
        .ok_or_else(|| ApiError::validation("Price must be a valid number"))?;

    let floored = number.floor();
    if floored < 0.0 {
        return Err(ApiError::validation("Price cannot be negative"));
    }
    if floored > f64::from(i32::MAX) {
        return Err(ApiError::validation("Price is out of range"));
    }
    Ok(floored as i32)
}

async fn resolve_category(state: &AppState, name: &str) -> Result<Uuid, ApiError> {
    tracing::debug!("Validating category name: {}", name);
    match state.repo.find_category_by_name(name).await? {
        Some(category) => Ok(category.id),
        None => {
            tracing::warn!("Invalid category name: {}", name);
            Err(ApiError::not_found(format!("Category \"{name}\" not found")))
        }
    }
}

async fn resolve_thumbnail(state: &AppState, name: &str) -> Result<Uuid, ApiError> {
    tracing::debug!("Validating thumbnail filename: {}", name);
    match state.repo.find_file_by_name(name).await? {
        Some(file) => Ok(file.id),
        None => {
            tracing::warn!("Invalid thumbnail filename: {}", name);
            Err(ApiError::not_found(format!("Thumbnail \"{name}\" not found")))
        }
    }
}

/// create_course
///
/// [Authenticated Route] Validates a course submission and stores it with the caller as
/// instructor.
///
/// - `title` and `description` are required.
/// - `price` goes through [`parse_price`].
/// - `published_status` silently falls back to `draft` for anything unrecognised.
/// - `category` and `thumbnail` are looked up by name and must exist when given.
///
/// Any `instructor` sent by the client is ignored.
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Created", body = CourseCreatedResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Category or thumbnail not found", body = ErrorResponse)
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<Json<CourseCreatedResponse>, ApiError> {
    let Some(caller) = caller else {
        tracing::warn!("No authenticated user found");
        return Err(ApiError::unauthorized("You must be logged in to create a course"));
    };
    tracing::debug!("Authenticated user ID: {}", caller.id);

    let Json(CourseRequest { data }) = payload?;
    let Some(data) = data else {
        tracing::warn!("Invalid request body: missing \"data\" object");
        return Err(ApiError::validation(
            "Request body must contain a \"data\" object",
        ));
    };

    let (Some(title), Some(description)) = (non_empty(data.title), non_empty(data.description))
    else {
        tracing::warn!("Missing required fields: title or description");
        return Err(ApiError::validation("Title and description are required"));
    };

    let price = parse_price(data.price.flatten().as_ref())?;
    let published_status = PublishedStatus::from_input(data.published_status.flatten().as_ref());
    tracing::debug!("Parsed price: {}, published status: {:?}", price, published_status);

    let category_id = match non_empty(data.category.flatten()) {
        Some(name) => Some(resolve_category(&state, &name).await?),
        None => None,
    };
    let thumbnail_id = match non_empty(data.thumbnail.flatten()) {
        Some(name) => Some(resolve_thumbnail(&state, &name).await?),
        None => None,
    };

    if state.repo.get_user(caller.id).await?.is_none() {
        tracing::error!("Instructor not found: ID {}", caller.id);
        return Err(ApiError::validation("Invalid instructor"));
    }

    let course = state
        .repo
        .create_course(NewCourse {
            title,
            description,
            price,
            published_status,
            thumbnail_id,
            category_id,
            instructor_id: caller.id,
        })
        .await?;
    tracing::debug!("Course created: ID {}", course.id);

    Ok(Json(CourseCreatedResponse {
        message: "Course created successfully".to_string(),
        course,
    }))
}

/// get_instructor_courses
///
/// [Policy-Gated Route] Courses taught by the caller. An instructor with no courses gets
/// a 404 rather than an empty list.
#[utoipa::path(
    get,
    path = "/api/instructor/courses",
    responses(
        (status = 200, description = "Caller's courses", body = InstructorCoursesResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "No courses", body = ErrorResponse)
    )
)]
pub async fn get_instructor_courses(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
) -> Result<Json<InstructorCoursesResponse>, ApiError> {
    let Some(caller) = caller else {
        tracing::warn!("Unauthorized access: no user in request");
        return Err(ApiError::unauthorized("You must be logged in as an instructor"));
    };

    let courses = state.repo.list_courses_by_instructor(caller.id).await?;
    if courses.is_empty() {
        tracing::info!("No courses found for instructor ID: {}", caller.id);
        return Err(ApiError::not_found("No courses found for this instructor"));
    }

    Ok(Json(InstructorCoursesResponse { courses }))
}

/// find_courses
///
/// [Authenticated Route] Every course, newest first.
#[utoipa::path(
    get,
    path = "/api/courses",
    responses((status = 200, description = "All courses", body = CourseListData))
)]
pub async fn find_courses(State(state): State<AppState>) -> Result<Json<CourseListData>, ApiError> {
    let data = state.repo.list_courses().await?;
    Ok(Json(CourseListData { data }))
}

/// find_course
///
/// [Authenticated Route] A single course by id.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Found", body = CourseData),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn find_course(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CourseData>, ApiError> {
    let Path(id) = id?;
    let data = state
        .repo
        .get_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    Ok(Json(CourseData { data }))
}

/// update_course
///
/// [Authenticated Route] Partial update applying the same field rules as creation. The
/// instructor cannot be changed; `null` or `""` for `category`/`thumbnail` clears it.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Updated", body = CourseData),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<Json<CourseData>, ApiError> {
    let Path(id) = id?;
    let Json(CourseRequest { data }) = payload?;
    let Some(data) = data else {
        return Err(ApiError::validation(
            "Request body must contain a \"data\" object",
        ));
    };

    if matches!(data.title.as_deref(), Some("")) || matches!(data.description.as_deref(), Some("")) {
        return Err(ApiError::validation("Title and description cannot be empty"));
    }

    // Absent leaves the price alone; `null` resets it to 0.
    let price = match data.price {
        None => None,
        Some(raw) => Some(parse_price(raw.as_ref())?),
    };

    // Absent leaves the relation alone; `null` or "" clears it.
    let category_id = match data.category.map(non_empty) {
        None => None,
        Some(None) => Some(None),
        Some(Some(name)) => Some(Some(resolve_category(&state, &name).await?)),
    };
    let thumbnail_id = match data.thumbnail.map(non_empty) {
        None => None,
        Some(None) => Some(None),
        Some(Some(name)) => Some(Some(resolve_thumbnail(&state, &name).await?)),
    };

    let changes = CourseChanges {
        title: data.title,
        description: data.description,
        price,
        published_status: data
            .published_status
            .map(|raw| PublishedStatus::from_input(raw.as_ref())),
        thumbnail_id,
        category_id,
    };

    let data = state
        .repo
        .update_course(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    Ok(Json(CourseData { data }))
}

/// delete_course
///
/// [Authenticated Route] Removes a course and returns the removed record.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Deleted", body = CourseData),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CourseData>, ApiError> {
    let Path(id) = id?;
    let data = state
        .repo
        .delete_course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    tracing::info!("Course deleted: ID {}", id);
    Ok(Json(CourseData { data }))
}
