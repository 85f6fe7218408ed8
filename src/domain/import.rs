// ==========================================
// 紧固件目录导入系统 - 导入领域模型
// ==========================================
// 职责: 标准化记录 / 行级告警 / 导入批次 / 导入结果
// ==========================================

use crate::domain::fastener::{FastenerRecord, Listing, NamedReference};
use crate::domain::thread_size::ThreadSize;
use crate::domain::types::{BatchStatus, CanonicalField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// MappedRow - 按卖家映射重命名后的行
// ==========================================
// 值已去除首尾空白；空值保留原样，由取值方法区分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedRow {
    pub values: BTreeMap<CanonicalField, String>,
}

impl MappedRow {
    /// 非空值（空白视为缺失）
    pub fn value(&self, field: CanonicalField) -> Option<&str> {
        self.raw(field).filter(|v| !v.is_empty())
    }

    /// 原始值（映射存在即返回，含空串）
    pub fn raw(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}

// ==========================================
// StandardizedRecord - 标准化后的行记录
// ==========================================
// 缺失字段保持 None，不做默认填充
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardizedRecord {
    pub product_id: Option<String>,
    pub description: Option<String>,
    pub thread_size: Option<ThreadSize>,
    pub material: Option<NamedReference>,
    pub finish: Option<NamedReference>,
    pub category: Option<NamedReference>,
}

// ==========================================
// RowWarning - 行级告警（非致命）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowWarning {
    pub row_number: usize, // 1 起始
    pub field: CanonicalField,
    pub raw_value: String,
    pub message: String,
}

// ==========================================
// RowOutcome - 单行导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: usize,
    pub fastener: FastenerRecord,
    pub listing: Listing,
}

// ==========================================
// ImportBatch - 导入批次记录
// ==========================================
// 对齐: import_batch 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,          // UUID v4
    pub seller_id: i64,
    pub file_name: Option<String>,
    pub total_rows: i64,           // 待处理行数
    pub success_rows: i64,         // 成功落库行数
    pub warning_rows: i64,         // 含告警的行数
    pub status: BatchStatus,
    pub error_message: Option<String>,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

// ==========================================
// ImportReport - 导入结果
// ==========================================
// 用途: 导入接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch: ImportBatch,
    pub outcomes: Vec<RowOutcome>,
    pub warnings: Vec<RowWarning>,
    pub elapsed_time: std::time::Duration,
}

impl ImportReport {
    pub fn success_rows(&self) -> usize {
        self.outcomes.len()
    }
}
