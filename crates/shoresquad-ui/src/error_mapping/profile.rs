use shoresquad_core::{AppError, StorageError};
use shoresquad_services::{ProfileError, StoreError};

use super::IntoAppError;

impl IntoAppError for StoreError {
    fn into_app_error(self) -> AppError {
        match self {
            StoreError::InvalidKey(key) => {
                AppError::Storage(StorageError::Unavailable(format!("invalid key {:?}", key)))
            }
            StoreError::Io(e) => AppError::Storage(StorageError::WriteFailed(e.to_string())),
        }
    }
}

impl IntoAppError for ProfileError {
    fn into_app_error(self) -> AppError {
        match self {
            ProfileError::Validation { field } => AppError::Validation(field.to_string()),
            ProfileError::Corrupt(e) => AppError::Storage(StorageError::Corruption(e.to_string())),
            ProfileError::Encode(e) => AppError::Storage(StorageError::WriteFailed(e.to_string())),
            ProfileError::Storage(e) => e.into_app_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoresquad_core::ErrorClass;

    #[test]
    fn test_validation_maps_to_blocking_notice() {
        let err = ProfileError::Validation { field: "email" }.into_app_error();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.user_message(), "Please fill in all fields");
    }

    #[test]
    fn test_corrupt_record() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProfileError::Corrupt(parse).into_app_error();
        assert!(matches!(err, AppError::Storage(StorageError::Corruption(_))));
    }
}
