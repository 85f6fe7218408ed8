// ==========================================
// 紧固件目录导入系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/导入错误为用户友好的错误消息
// ==========================================

use crate::domain::seller::MappingValidationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    /// 行级致命错误（带行号）
    #[error("第 {row} 行导入失败: {reason}")]
    RowRejected { row: usize, reason: String },

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }

            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(_) | ImportError::UnsupportedFormat(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            ImportError::SellerNotFound(seller_id) => {
                ApiError::NotFound(format!("Seller(id={})不存在", seller_id))
            }
            ImportError::InvalidThreadSize { row, .. } | ImportError::MissingField { row, .. } => {
                ApiError::RowRejected {
                    row,
                    reason: err.to_string(),
                }
            }
            ImportError::InvalidMapping(msg) => ApiError::ValidationError(msg),
            ImportError::Repository(repo_err) => repo_err.into(),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 MappingValidationError 转换
// ==========================================
impl From<MappingValidationError> for ApiError {
    fn from(err: MappingValidationError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ThreadSizeError;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Seller".to_string(),
            id: "7".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Seller"));
                assert!(msg.contains("7"));
            }
            _ => panic!("Expected NotFound"),
        }

        let repo_err = RepositoryError::UniqueConstraintViolation(
            "UNIQUE constraint failed: seller.name".to_string(),
        );
        assert!(matches!(
            ApiError::from(repo_err),
            ApiError::BusinessRuleViolation(_)
        ));
    }

    #[test]
    fn test_import_error_conversion() {
        let import_err = ImportError::InvalidThreadSize {
            row: 2,
            value: "M12".to_string(),
            reason: ThreadSizeError::InvalidFormat("M12".to_string()),
        };
        match ApiError::from(import_err) {
            ApiError::RowRejected { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("M12"));
            }
            other => panic!("Expected RowRejected, got {:?}", other),
        }

        assert!(matches!(
            ApiError::from(ImportError::SellerNotFound(9)),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(ImportError::Repository(RepositoryError::LockError("x".into()))),
            ApiError::DatabaseConnectionError(_)
        ));
    }
}
