// ==========================================
// 紧固件目录导入系统 - 目录导入 Trait
// ==========================================
// 职责: 定义目录导入接口（不包含实现）
// ==========================================

use crate::domain::import::{ImportReport, MappedRow};
use crate::domain::seller::SellerMapping;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 原始行（表头 → 单元格文本）
pub type RawRow = HashMap<String, String>;

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 目录导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 从 CSV 文件导入卖家目录
    ///
    /// # 参数
    /// - seller_id: 卖家 id（决定列映射与挂牌归属）
    /// - file_path: CSV 文件路径（.csv）
    ///
    /// # 返回
    /// - Ok(ImportReport): 逐行结果 + 告警 + 批次记录
    /// - Err: 文件错误、卖家不存在、首个致命行错误、存储错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 按卖家映射重命名列
    /// 3. 逐行标准化（规格解析、参考实体查找或创建）
    /// 4. 紧固件 upsert + 挂牌 upsert
    /// 5. 记录导入批次
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        seller_id: i64,
        file_path: P,
    ) -> ImportResult<ImportReport>;

    /// 导入已解析的原始行
    ///
    /// # 说明
    /// - 行号按 rows 顺序从 1 开始
    /// - 遇到首个致命错误即终止，之前的行保留在库中
    async fn import_rows(
        &self,
        seller_id: i64,
        rows: Vec<RawRow>,
        file_name: Option<String>,
    ) -> ImportResult<ImportReport>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 参数
    /// - jobs: (seller_id, 文件路径) 列表
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 结果顺序与 jobs 顺序一致
    async fn batch_import(&self, jobs: Vec<(i64, PathBuf)>) -> Vec<ImportResult<ImportReport>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过全空行）
    /// - Err: 文件不存在、扩展名不支持、CSV 格式错误
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;

    /// 解析任意字节流
    fn parse_reader(&self, reader: Box<dyn Read + '_>) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 卖家列 → 标准字段
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 按映射重命名原始行（未登记的列忽略）
    fn remap(&self, row: &RawRow, mapping: &SellerMapping) -> MappedRow;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本标准化 + 价格/数量宽松解析
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 描述: 去首尾空白、合并连续空白、转大写
    fn normalize_description(&self, value: &str) -> String;

    /// 名称: 去首尾空白后标题化
    fn normalize_name(&self, value: &str) -> String;

    /// 解析价格（两位小数）
    ///
    /// # 返回
    /// - Some(f64): 有限且非负
    /// - None: 空值、非数字、负数、非有限值
    fn parse_price(&self, value: &str) -> Option<f64>;

    /// 解析数量（非负整数）
    fn parse_quantity(&self, value: &str) -> Option<i64>;
}
