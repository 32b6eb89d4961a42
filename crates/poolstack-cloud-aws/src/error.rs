//! AWS provider error types

use poolstack_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{operation} failed: {message}")]
    Sdk {
        operation: &'static str,
        message: String,
    },

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cloud error: {0}")]
    CloudError(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, AwsError>;

impl From<AwsError> for CloudError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::NotFound(what) => CloudError::ResourceNotFound(what),
            AwsError::InvalidInput(message) => CloudError::InvalidConfig(message),
            AwsError::CloudError(inner) => inner,
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

/// Render an SDK error with its full context chain
pub(crate) fn sdk_error<E>(operation: &'static str, err: E) -> AwsError
where
    E: std::error::Error,
{
    AwsError::Sdk {
        operation,
        message: aws_sdk_iam::error::DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_cloud_not_found() {
        let err: CloudError = AwsError::NotFound("role hogepool-SMS-Role".to_string()).into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_sdk_error_maps_to_api_error() {
        let err: CloudError = AwsError::Sdk {
            operation: "CreateRole",
            message: "AccessDenied".to_string(),
        }
        .into();
        match err {
            CloudError::ApiError(message) => {
                assert_eq!(message, "CreateRole failed: AccessDenied")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrapped_cloud_error_is_unwrapped() {
        let err: CloudError =
            AwsError::CloudError(CloudError::InvalidConfig("bad".to_string())).into();
        assert!(matches!(err, CloudError::InvalidConfig(_)));
    }
}
