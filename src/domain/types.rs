// ==========================================
// 紧固件目录导入系统 - 领域类型定义
// ==========================================
// 职责: 螺纹制式 / 单位 / 参考实体种类 / 标准字段
// 序列化格式: 与数据库存储值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 螺纹制式 (Thread Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadType {
    Metric,   // 公制 ISO
    Imperial, // 英制 UTS
}

impl ThreadType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ThreadType::Metric => "metric",
            ThreadType::Imperial => "imperial",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "metric" => Some(ThreadType::Metric),
            "imperial" => Some(ThreadType::Imperial),
            _ => None,
        }
    }
}

impl fmt::Display for ThreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 长度单位 (Unit Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Millimeter,
    Inch,
}

impl UnitType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            UnitType::Millimeter => "millimeter",
            UnitType::Inch => "inch",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "millimeter" => Some(UnitType::Millimeter),
            "inch" => Some(UnitType::Inch),
            _ => None,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 参考实体种类 (Reference Kind)
// ==========================================
// 材质 / 表面处理 / 品类 共用同一套按名称去重的存储结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Material,
    Finish,
    Category,
}

impl ReferenceKind {
    /// 对应的数据表名（固定白名单，不接受外部输入）
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceKind::Material => "material",
            ReferenceKind::Finish => "finish",
            ReferenceKind::Category => "category",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

// ==========================================
// 标准字段 (Canonical Field)
// ==========================================
// 卖家原始列名最终映射到的目标字段集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    ProductId,
    Description,
    ThreadSize,
    Material,
    Finish,
    Category,
    Price,
    Quantity,
}

/// 创建紧固件所必需的字段（静态声明）
pub const REQUIRED_FIELDS: [CanonicalField; 6] = [
    CanonicalField::ProductId,
    CanonicalField::Description,
    CanonicalField::ThreadSize,
    CanonicalField::Material,
    CanonicalField::Finish,
    CanonicalField::Category,
];

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::ProductId,
        CanonicalField::Description,
        CanonicalField::ThreadSize,
        CanonicalField::Material,
        CanonicalField::Finish,
        CanonicalField::Category,
        CanonicalField::Price,
        CanonicalField::Quantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::ProductId => "product_id",
            CanonicalField::Description => "description",
            CanonicalField::ThreadSize => "thread_size",
            CanonicalField::Material => "material",
            CanonicalField::Finish => "finish",
            CanonicalField::Category => "category",
            CanonicalField::Price => "price",
            CanonicalField::Quantity => "quantity",
        }
    }

    pub fn is_required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("未知的标准字段: {}", s))
    }
}

// ==========================================
// 导入批次状态 (Batch Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Completed, // 全部行处理完成
    Failed,    // 中途遇到致命错误（已处理的行保留）
}

impl BatchStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "COMPLETED" => BatchStatus::Completed,
            _ => BatchStatus::Failed,
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_field_from_str() {
        assert_eq!(
            "thread_size".parse::<CanonicalField>(),
            Ok(CanonicalField::ThreadSize)
        );
        assert!("weight".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_required_fields_exclude_price_and_quantity() {
        assert!(CanonicalField::ProductId.is_required());
        assert!(CanonicalField::ThreadSize.is_required());
        assert!(!CanonicalField::Price.is_required());
        assert!(!CanonicalField::Quantity.is_required());
    }

    #[test]
    fn test_canonical_field_serde_snake_case() {
        let json = serde_json::to_string(&CanonicalField::ProductId).unwrap();
        assert_eq!(json, "\"product_id\"");
    }

    #[test]
    fn test_thread_type_db_round() {
        assert_eq!(ThreadType::from_db_str("metric"), Some(ThreadType::Metric));
        assert_eq!(UnitType::Inch.to_db_str(), "inch");
        assert_eq!(ThreadType::from_db_str("whitworth"), None);
    }
}
