// ==========================================
// 紧固件目录导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 行号一律 1 起始（不含表头）
// ==========================================

use crate::engine::error::ThreadSizeError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 行级致命错误 =====
    #[error("螺纹规格无效 (行 {row}): {value} ({reason})")]
    InvalidThreadSize {
        row: usize,
        value: String,
        reason: ThreadSizeError,
    },

    #[error("必填字段缺失 (行 {row}): {field}")]
    MissingField { row: usize, field: String },

    // ===== 卖家错误 =====
    #[error("卖家不存在: seller_id={0}")]
    SellerNotFound(i64),

    #[error("卖家列映射无效: {0}")]
    InvalidMapping(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 存储错误（原样透传）=====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 出错行号（非行级错误返回 None）
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::InvalidThreadSize { row, .. } | ImportError::MissingField { row, .. } => {
                Some(*row)
            }
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>（经由仓储层错误分类）
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InvalidMapping(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_thread_size_message_names_row_and_value() {
        let err = ImportError::InvalidThreadSize {
            row: 3,
            value: "invalid-size".to_string(),
            reason: ThreadSizeError::InvalidFormat("invalid-size".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("行 3"));
        assert!(message.contains("invalid-size"));
        assert_eq!(err.row(), Some(3));
    }

    #[test]
    fn test_repository_error_passes_through() {
        let err: ImportError = RepositoryError::LockError("poisoned".to_string()).into();
        assert_eq!(err.to_string(), "数据库锁获取失败: poisoned");
        assert_eq!(err.row(), None);
    }
}
