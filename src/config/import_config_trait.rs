// ==========================================
// 紧固件目录导入系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 价格缺失或无法解析时的回退值
    ///
    /// # 默认值
    /// - 0.00
    async fn get_default_price(&self) -> ImportResult<f64>;

    /// 数量缺失或无法解析时的回退值
    ///
    /// # 默认值
    /// - 0
    async fn get_default_quantity(&self) -> ImportResult<i64>;

    /// CSV 分隔符（单个 ASCII 字符）
    ///
    /// # 默认值
    /// - b','
    async fn get_csv_delimiter(&self) -> ImportResult<u8>;
}
