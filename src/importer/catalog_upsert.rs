// ==========================================
// 紧固件目录导入系统 - 目录 Upsert 服务
// ==========================================
// 职责: StandardizedRecord → FastenerRecord + Listing
// 规则:
// - 紧固件按 product_id 去重，存在则原地更新已提供字段
// - 挂牌按 (seller, fastener) 去重，last-write-wins
// - 价格/数量无法解析时使用默认值并记录行级告警
// ==========================================

use crate::domain::fastener::{FastenerFields, FastenerRecord, Listing};
use crate::domain::import::{RowWarning, StandardizedRecord};
use crate::domain::types::CanonicalField;
use crate::importer::catalog_importer_trait::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::CatalogRepository;
use std::sync::Arc;
use tracing::warn;

/// 挂牌默认值（来自 ImportConfigReader）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingDefaults {
    pub price: f64,
    pub quantity: i64,
}

impl Default for ListingDefaults {
    fn default() -> Self {
        Self {
            price: 0.0,
            quantity: 0,
        }
    }
}

pub struct CatalogUpsertService {
    catalog_repo: Arc<dyn CatalogRepository>,
    data_cleaner: Box<dyn DataCleaner>,
    defaults: ListingDefaults,
}

impl CatalogUpsertService {
    pub fn new(
        catalog_repo: Arc<dyn CatalogRepository>,
        data_cleaner: Box<dyn DataCleaner>,
        defaults: ListingDefaults,
    ) -> Self {
        Self {
            catalog_repo,
            data_cleaner,
            defaults,
        }
    }

    /// 按 product_id 创建或更新紧固件
    ///
    /// # 返回
    /// - Err(MissingField): product_id 缺失，或新建时必填字段缺失
    pub fn upsert_fastener(
        &self,
        record: &StandardizedRecord,
        row_number: usize,
    ) -> ImportResult<FastenerRecord> {
        let product_id = record
            .product_id
            .as_deref()
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: CanonicalField::ProductId.as_str().to_string(),
            })?;

        let fields = FastenerFields {
            description: record.description.clone(),
            thread_size_id: record.thread_size.as_ref().map(|t| t.id),
            material_id: record.material.as_ref().map(|r| r.id),
            finish_id: record.finish.as_ref().map(|r| r.id),
            category_id: record.category.as_ref().map(|r| r.id),
        };

        if self.catalog_repo.find_fastener(product_id)?.is_none() {
            let missing = fields.missing_for_create();
            if !missing.is_empty() {
                return Err(ImportError::MissingField {
                    row: row_number,
                    field: missing.join(", "),
                });
            }
        }

        Ok(self.catalog_repo.upsert_fastener(product_id, &fields)?)
    }

    /// 创建或更新挂牌
    ///
    /// # 参数
    /// - price_raw / quantity_raw: 映射后的原始文本（None 表示未映射或源列缺失）
    ///
    /// # 返回
    /// - (Listing, 本行告警)
    pub fn upsert_listing(
        &self,
        seller_id: i64,
        fastener_id: i64,
        price_raw: Option<&str>,
        quantity_raw: Option<&str>,
        row_number: usize,
    ) -> ImportResult<(Listing, Vec<RowWarning>)> {
        let mut warnings = Vec::new();

        let price = match price_raw {
            None => self.defaults.price,
            Some(raw) => match self.data_cleaner.parse_price(raw) {
                Some(price) => price,
                None => {
                    warnings.push(self.coercion_warning(
                        row_number,
                        CanonicalField::Price,
                        raw,
                        self.defaults.price.to_string(),
                    ));
                    self.defaults.price
                }
            },
        };

        let quantity = match quantity_raw {
            None => self.defaults.quantity,
            Some(raw) => match self.data_cleaner.parse_quantity(raw) {
                Some(quantity) => quantity,
                None => {
                    warnings.push(self.coercion_warning(
                        row_number,
                        CanonicalField::Quantity,
                        raw,
                        self.defaults.quantity.to_string(),
                    ));
                    self.defaults.quantity
                }
            },
        };

        let listing = self
            .catalog_repo
            .upsert_listing(seller_id, fastener_id, price, quantity)?;

        Ok((listing, warnings))
    }

    fn coercion_warning(
        &self,
        row_number: usize,
        field: CanonicalField,
        raw: &str,
        fallback: String,
    ) -> RowWarning {
        warn!(
            row_number,
            field = %field,
            raw_value = %raw,
            fallback = %fallback,
            "数值无法解析，使用默认值"
        );
        RowWarning {
            row_number,
            field,
            raw_value: raw.to_string(),
            message: format!("{} 无法解析: {:?}，已使用默认值 {}", field, raw, fallback),
        }
    }
}
