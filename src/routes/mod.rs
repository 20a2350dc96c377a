//! Route tables, split by access level. Everything here is nested under `/api` by
//! [`create_router`](crate::create_router).

/// Open to anonymous callers.
pub mod public;

/// Wrapped in the `is_authenticated` policy; any role passes.
pub mod authenticated;
