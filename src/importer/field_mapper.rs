// ==========================================
// 紧固件目录导入系统 - 字段映射器实现
// ==========================================
// 职责: 卖家原始列名 → 标准字段（按卖家 csv_mapping）
// ==========================================

use crate::domain::import::MappedRow;
use crate::domain::seller::SellerMapping;
use crate::importer::catalog_importer_trait::{FieldMapper as FieldMapperTrait, RawRow};

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn remap(&self, row: &RawRow, mapping: &SellerMapping) -> MappedRow {
        let mut mapped = MappedRow::default();
        for (column, field) in &mapping.column_map {
            if let Some(value) = row.get(column) {
                mapped.values.insert(*field, value.trim().to_string());
            }
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CanonicalField;
    use std::collections::BTreeMap;

    fn mapping() -> SellerMapping {
        SellerMapping::new(BTreeMap::from([
            ("Part No".to_string(), CanonicalField::ProductId),
            ("Size".to_string(), CanonicalField::ThreadSize),
            ("Unit Price".to_string(), CanonicalField::Price),
        ]))
    }

    #[test]
    fn test_remap_renames_and_ignores_unmapped() {
        let row = RawRow::from([
            ("Part No".to_string(), " BOLT-001 ".to_string()),
            ("Size".to_string(), "M12-1.75".to_string()),
            ("Warehouse".to_string(), "B7".to_string()),
        ]);

        let mapped = FieldMapper.remap(&row, &mapping());

        assert_eq!(mapped.values.len(), 2);
        assert_eq!(mapped.value(CanonicalField::ProductId), Some("BOLT-001"));
        assert_eq!(mapped.value(CanonicalField::ThreadSize), Some("M12-1.75"));
        // 映射存在但源列缺失
        assert_eq!(mapped.raw(CanonicalField::Price), None);
    }

    #[test]
    fn test_remap_blank_value_is_missing_but_present() {
        let row = RawRow::from([
            ("Part No".to_string(), "BOLT-001".to_string()),
            ("Unit Price".to_string(), "   ".to_string()),
        ]);

        let mapped = FieldMapper.remap(&row, &mapping());

        assert_eq!(mapped.value(CanonicalField::Price), None);
        assert_eq!(mapped.raw(CanonicalField::Price), Some(""));
    }
}
