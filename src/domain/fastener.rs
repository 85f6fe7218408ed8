// ==========================================
// 紧固件目录导入系统 - 紧固件领域模型
// ==========================================
// 职责: 参考实体 / 紧固件主数据 / 卖家挂牌
// 红线: 本管道只创建与更新，从不删除
// ==========================================

use crate::domain::types::ReferenceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// NamedReference - 按名称去重的参考实体
// ==========================================
// 对齐: material / finish / category 表（name UNIQUE）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedReference {
    pub id: i64,
    pub kind: ReferenceKind,
    pub name: String, // 已标题化
}

// ==========================================
// FastenerRecord - 紧固件主数据
// ==========================================
// 去重键: product_id
// 对齐: fastener 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerRecord {
    pub id: i64,
    pub product_id: String,
    pub description: String,
    pub thread_size_id: i64,
    pub material_id: i64,
    pub finish_id: i64,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// FastenerFields - 紧固件可写字段
// ==========================================
// None 表示本次未提供：创建时视为缺失，更新时保持原值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FastenerFields {
    pub description: Option<String>,
    pub thread_size_id: Option<i64>,
    pub material_id: Option<i64>,
    pub finish_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl FastenerFields {
    /// 创建紧固件时缺失的字段名
    pub fn missing_for_create(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.description.is_none() {
            missing.push("description");
        }
        if self.thread_size_id.is_none() {
            missing.push("thread_size");
        }
        if self.material_id.is_none() {
            missing.push("material");
        }
        if self.finish_id.is_none() {
            missing.push("finish");
        }
        if self.category_id.is_none() {
            missing.push("category");
        }
        missing
    }
}

// ==========================================
// Listing - 卖家挂牌（价格/库存）
// ==========================================
// 去重键: (seller_id, fastener_id)
// 对齐: seller_fastener 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub seller_id: i64,
    pub fastener_id: i64,
    pub price: f64,    // >= 0，两位小数
    pub quantity: i64, // >= 0
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_for_create_all_missing() {
        let fields = FastenerFields::default();
        assert_eq!(
            fields.missing_for_create(),
            vec!["description", "thread_size", "material", "finish", "category"]
        );
    }

    #[test]
    fn test_missing_for_create_partial() {
        let fields = FastenerFields {
            description: Some("HEX BOLT".to_string()),
            thread_size_id: Some(1),
            material_id: Some(2),
            finish_id: None,
            category_id: Some(3),
        };
        assert_eq!(fields.missing_for_create(), vec!["finish"]);
    }
}
