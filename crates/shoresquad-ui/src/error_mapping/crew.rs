use shoresquad_core::AppError;
use shoresquad_services::CrewError;

use super::IntoAppError;

impl IntoAppError for CrewError {
    fn into_app_error(self) -> AppError {
        match self {
            CrewError::MissingField(field) => AppError::Validation(field.to_string()),
            CrewError::AlreadyJoined(name) => {
                AppError::Service(format!("already a member of {}", name))
            }
            CrewError::NotFound(id) => AppError::Service(format!("crew {} not found", id)),
        }
    }
}
