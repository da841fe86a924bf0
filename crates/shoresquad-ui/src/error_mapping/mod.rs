//! Maps crate errors to shoresquad_core::AppError for consistent user-facing messages.
//! Each source crate has its own module to keep mappings small and readable.

use shoresquad_core::AppError;

mod crew;
mod profile;
mod render;
mod weather;

/// Conversion into the top-level error, implemented for every error the page
/// can run into.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}
