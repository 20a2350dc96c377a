use crate::{
    AppState,
    handlers::{auth, course, upload},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Every route here sits behind the `is_authenticated` policy layer, which resolves the
/// caller before the handler runs. Handlers still take the caller from `AuthUser` and never
/// from the request body.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /users/me
        .route("/users/me", get(auth::get_profile))
        // GET /instructor/courses
        // Courses whose instructor is the caller. 404 when there are none.
        .route("/instructor/courses", get(course::get_instructor_courses))
        // GET/POST /courses
        // POST forces the instructor to the caller.
        .route(
            "/courses",
            get(course::find_courses).post(course::create_course),
        )
        .route(
            "/courses/{id}",
            get(course::find_course)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        // POST /upload/presigned
        // Registers a thumbnail upload and returns a 10-minute PUT URL.
        .route("/upload/presigned", post(upload::get_presigned_url))
}
