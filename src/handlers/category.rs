use axum::{Json, extract::State};

use crate::{AppState, error::ApiError, models::CategoryListData};

/// list_categories
///
/// [Public Route] The seeded course categories, alphabetical. Frontends use the names as
/// the `category` value when creating a course.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories", body = CategoryListData))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListData>, ApiError> {
    let data = state.repo.list_categories().await?;
    Ok(Json(CategoryListData { data }))
}
