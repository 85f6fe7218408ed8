// ==========================================
// 紧固件目录导入系统 - 规格引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 螺纹规格解析/校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThreadSizeError {
    /// 既不符合公制也不符合英制文法
    #[error("螺纹规格格式无效: {0}")]
    InvalidFormat(String),

    #[error("螺纹规格 {size_str} 的 {field} 必须为正数，实际为 {value}")]
    NonPositive {
        size_str: String,
        field: &'static str,
        value: f64,
    },

    /// 符合文法但数值超出可表示范围
    #[error("螺纹规格 {size_str} 的 {field} 超出取值范围")]
    OutOfRange {
        size_str: String,
        field: &'static str,
    },
}

/// Result 类型别名
pub type ThreadSizeResult<T> = Result<T, ThreadSizeError>;
