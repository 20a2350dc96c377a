//! Request handlers, grouped by content type. Each handler validates its typed payload at
//! the boundary and reports failures as [`ApiError`](crate::error::ApiError).

pub mod auth;
pub mod category;
pub mod course;
pub mod upload;

/// Treats an empty string the same as a missing field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
