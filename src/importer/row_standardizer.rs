// ==========================================
// 紧固件目录导入系统 - 行标准化
// ==========================================
// 职责: MappedRow → StandardizedRecord
// 规则:
// - description: 空白合并 + 大写；已映射的空白值保留为空串
// - thread_size: 以 M 开头时 '/' 替换为 '-'，解析后按规格对查找或创建（名称取公制规格名）
// - material / finish / category: 标题化后按名称查找或创建
// - product_id: 原样透传
// - 其余字段空白视为缺失，保持 None
// ==========================================

use crate::domain::fastener::NamedReference;
use crate::domain::import::{MappedRow, StandardizedRecord};
use crate::domain::thread_size::ThreadSize;
use crate::domain::types::{CanonicalField, ReferenceKind};
use crate::engine::thread_descriptor::ThreadDescriptorBuilder;
use crate::importer::catalog_importer_trait::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::CatalogRepository;
use std::sync::Arc;
use tracing::debug;

pub struct RowStandardizer {
    catalog_repo: Arc<dyn CatalogRepository>,
    data_cleaner: Box<dyn DataCleaner>,
    descriptor_builder: ThreadDescriptorBuilder,
}

impl RowStandardizer {
    pub fn new(catalog_repo: Arc<dyn CatalogRepository>, data_cleaner: Box<dyn DataCleaner>) -> Self {
        Self {
            catalog_repo,
            data_cleaner,
            descriptor_builder: ThreadDescriptorBuilder,
        }
    }

    /// 标准化单行
    ///
    /// # 参数
    /// - row: 已按卖家映射重命名的行
    /// - row_number: 1 起始行号（用于错误信息）
    ///
    /// # 返回
    /// - Ok(StandardizedRecord): 参考实体已落库
    /// - Err(InvalidThreadSize): 规格无法解析或校验失败
    /// - Err(Repository): 存储错误
    pub fn standardize(&self, row: &MappedRow, row_number: usize) -> ImportResult<StandardizedRecord> {
        let product_id = row.value(CanonicalField::ProductId).map(str::to_string);

        let description = row
            .raw(CanonicalField::Description)
            .map(|v| self.data_cleaner.normalize_description(v));

        let thread_size = match row.value(CanonicalField::ThreadSize) {
            Some(raw) => Some(self.resolve_thread_size(raw, row_number)?),
            None => None,
        };

        let material = self.resolve_reference(row, CanonicalField::Material, ReferenceKind::Material)?;
        let finish = self.resolve_reference(row, CanonicalField::Finish, ReferenceKind::Finish)?;
        let category = self.resolve_reference(row, CanonicalField::Category, ReferenceKind::Category)?;

        Ok(StandardizedRecord {
            product_id,
            description,
            thread_size,
            material,
            finish,
            category,
        })
    }

    fn resolve_thread_size(&self, raw: &str, row_number: usize) -> ImportResult<ThreadSize> {
        let size_str = normalize_size_token(raw);

        let descriptor = self
            .descriptor_builder
            .build(&size_str)
            .map_err(|reason| ImportError::InvalidThreadSize {
                row: row_number,
                value: raw.to_string(),
                reason,
            })?;

        let thread_size = self
            .catalog_repo
            .find_or_create_thread_size(&descriptor.metric_size_str, &descriptor)?;
        debug!(row_number, thread_size_id = thread_size.id, name = %thread_size.name, "螺纹规格已解析");

        Ok(thread_size)
    }

    fn resolve_reference(
        &self,
        row: &MappedRow,
        field: CanonicalField,
        kind: ReferenceKind,
    ) -> ImportResult<Option<NamedReference>> {
        let name = match row.value(field) {
            Some(raw) => self.data_cleaner.normalize_name(raw),
            None => return Ok(None),
        };
        if name.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.catalog_repo.find_or_create_named_reference(kind, &name)?))
    }
}

/// 公制规格中的 '/' 视为 '-'（如 "M12/1.75"）
pub fn normalize_size_token(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('M') {
        trimmed.replace('/', "-")
    } else {
        trimmed.to_string()
    }
}
