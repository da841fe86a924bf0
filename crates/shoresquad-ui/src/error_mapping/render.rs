use shoresquad_core::AppError;

use crate::render::RenderError;

use super::IntoAppError;

impl IntoAppError for RenderError {
    fn into_app_error(self) -> AppError {
        AppError::Render(self.to_string())
    }
}
