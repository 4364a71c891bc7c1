use rmcp::ErrorData as RpcError;

use thiserror::Error;
use tokio::io;

use crate::catalog::CatalogError;
use crate::coach::CoachError;
use crate::config::ConfigError;
use crate::detector::DetectError;
use crate::goals::GoalError;
use crate::storage::StorageError;

pub type ServiceResult<T> = core::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Detect(#[from] DetectError),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Goal(#[from] GoalError),
    #[error("{0}")]
    Coach(#[from] CoachError),
    #[error("{0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    RpcError(#[from] RpcError),
    #[error("{0}")]
    IoError(#[from] io::Error),
    #[error("{0}")]
    Other(String),
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RpcError(inner) => inner,
            ServiceError::Detect(_) | ServiceError::Catalog(_) | ServiceError::Goal(_) => {
                RpcError::invalid_params(err.to_string(), None)
            }
            other => RpcError::internal_error(other.to_string(), None),
        }
    }
}

/// Converts any module error into the error an MCP tool call returns.
pub fn rpc_error<E: Into<ServiceError>>(err: E) -> RpcError {
    err.into().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn domain_errors_are_invalid_params() {
        let err = rpc_error(GoalError::EmptyTitle);
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Goal title must not be empty");

        let err = rpc_error(DetectError::RepositoryAnalysis);
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn storage_errors_are_internal() {
        let io = std::io::Error::other("disk full");
        let err = rpc_error(StorageError::from(io));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
