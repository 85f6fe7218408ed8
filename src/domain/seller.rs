// ==========================================
// 紧固件目录导入系统 - 卖家领域模型
// ==========================================
// 职责: 卖家主数据 + CSV 列映射
// 用途: 列映射由卖家登记时写入，导入管道只读
// ==========================================

use crate::domain::types::{CanonicalField, REQUIRED_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ==========================================
// SellerMapping - 卖家 CSV 列映射
// ==========================================
// 原始列名 → 标准字段；未登记的原始列在导入时忽略
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerMapping {
    pub column_map: BTreeMap<String, CanonicalField>,
}

/// 列映射校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingValidationError {
    #[error("csv_mapping 缺少必填字段: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    #[error("csv_mapping 中标准字段 {field} 被多个列映射: {}", .columns.join(", "))]
    DuplicateTarget { field: String, columns: Vec<String> },
}

impl SellerMapping {
    pub fn new(column_map: BTreeMap<String, CanonicalField>) -> Self {
        Self { column_map }
    }

    /// 校验列映射
    ///
    /// # 规则
    /// 1. REQUIRED_FIELDS 中每个字段都必须是某个原始列的映射目标
    /// 2. 同一标准字段不允许由多个原始列映射
    pub fn validate(&self) -> Result<(), MappingValidationError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !self.column_map.values().any(|v| v == *field))
            .map(|field| field.as_str().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MappingValidationError::MissingRequiredFields(missing));
        }

        let mut by_target: BTreeMap<CanonicalField, Vec<String>> = BTreeMap::new();
        for (column, field) in &self.column_map {
            by_target.entry(*field).or_default().push(column.clone());
        }
        if let Some((field, columns)) = by_target.into_iter().find(|(_, cols)| cols.len() > 1) {
            return Err(MappingValidationError::DuplicateTarget {
                field: field.as_str().to_string(),
                columns,
            });
        }

        Ok(())
    }

    /// 按标准字段反查原始列名
    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.column_map
            .iter()
            .find(|(_, f)| **f == field)
            .map(|(column, _)| column.as_str())
    }
}

// ==========================================
// Seller - 卖家主数据
// ==========================================
// 对齐: seller 表（name / contact_email 唯一）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    pub name: String,
    pub contact_email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub csv_mapping: SellerMapping,
}

/// 新卖家登记参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeller {
    pub name: String,
    pub contact_email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub csv_mapping: SellerMapping,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_mapping() -> SellerMapping {
        let json = r#"{
            "Part No": "product_id",
            "Desc": "description",
            "Size": "thread_size",
            "Mat": "material",
            "Coating": "finish",
            "Type": "category",
            "Unit Price": "price",
            "Stock": "quantity"
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_mapping_deserialize_from_json_object() {
        let mapping = full_mapping();
        assert_eq!(mapping.column_map.len(), 8);
        assert_eq!(mapping.column_for(CanonicalField::ThreadSize), Some("Size"));
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_mapping_unknown_target_rejected() {
        let json = r#"{"Part No": "product_id", "Weight": "weight"}"#;
        let result: Result<SellerMapping, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_mapping_missing_required() {
        let mut mapping = full_mapping();
        mapping.column_map.remove("Coating");
        mapping.column_map.remove("Type");

        let err = mapping.validate().unwrap_err();
        assert_eq!(
            err,
            MappingValidationError::MissingRequiredFields(vec![
                "finish".to_string(),
                "category".to_string()
            ])
        );
        assert!(err.to_string().contains("finish, category"));
    }

    #[test]
    fn test_mapping_price_and_quantity_optional() {
        let mut mapping = full_mapping();
        mapping.column_map.remove("Unit Price");
        mapping.column_map.remove("Stock");
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_mapping_duplicate_target() {
        let mut mapping = full_mapping();
        mapping
            .column_map
            .insert("Description 2".to_string(), CanonicalField::Description);

        match mapping.validate() {
            Err(MappingValidationError::DuplicateTarget { field, columns }) => {
                assert_eq!(field, "description");
                assert_eq!(columns, vec!["Desc".to_string(), "Description 2".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
