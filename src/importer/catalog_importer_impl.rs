// ==========================================
// 紧固件目录导入系统 - 目录导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 列映射 → 标准化 → 紧固件 upsert → 挂牌 upsert → 批次记录
// 约束: 单次导入内逐行顺序执行；首个致命错误终止本次导入
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportBatch, ImportReport, RowOutcome, RowWarning};
use crate::domain::seller::Seller;
use crate::domain::types::{BatchStatus, CanonicalField};
use crate::importer::catalog_importer_trait::{
    CatalogImporter, FieldMapper, FileParser, RawRow,
};
use crate::importer::catalog_upsert::{CatalogUpsertService, ListingDefaults};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::CsvParser;
use crate::importer::row_standardizer::RowStandardizer;
use crate::repository::{CatalogRepository, ImportBatchRepository, SellerRepository};
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// CatalogImporterImpl - 目录导入器实现
// ==========================================
pub struct CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 数据访问层
    catalog_repo: Arc<dyn CatalogRepository>,
    seller_repo: Arc<SellerRepository>,
    batch_repo: Arc<ImportBatchRepository>,

    // 配置读取器
    config: C,

    // 导入组件
    field_mapper: Box<dyn FieldMapper>,
    row_standardizer: RowStandardizer,
}

impl<C> CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - catalog_repo: 目录仓储
    /// - seller_repo: 卖家仓储
    /// - batch_repo: 导入批次仓储
    /// - config: 配置读取器
    pub fn new(
        catalog_repo: Arc<dyn CatalogRepository>,
        seller_repo: Arc<SellerRepository>,
        batch_repo: Arc<ImportBatchRepository>,
        config: C,
    ) -> Self {
        let row_standardizer = RowStandardizer::new(catalog_repo.clone(), Box::new(DataCleanerImpl));
        Self {
            catalog_repo,
            seller_repo,
            batch_repo,
            config,
            field_mapper: Box::new(FieldMapperImpl),
            row_standardizer,
        }
    }
}

#[async_trait::async_trait]
impl<C> CatalogImporter for CatalogImporterImpl<C>
where
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        seller_id: i64,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!(file_path = %path.display(), "开始导入卖家目录");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let delimiter = self.config.get_csv_delimiter().await?;
        let raw_rows = CsvParser::new(delimiter)
            .parse_to_raw_records(path)
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;
        info!(total_rows = raw_rows.len(), "文件解析完成");

        self.import_rows(seller_id, raw_rows, Some(file_name)).await
    }

    #[instrument(skip(self, rows), fields(batch_id))]
    async fn import_rows(
        &self,
        seller_id: i64,
        rows: Vec<RawRow>,
        file_name: Option<String>,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let seller = self
            .seller_repo
            .find_by_id(seller_id)?
            .ok_or(ImportError::SellerNotFound(seller_id))?;

        let defaults = ListingDefaults {
            price: self.config.get_default_price().await?,
            quantity: self.config.get_default_quantity().await?,
        };
        let upsert_service =
            CatalogUpsertService::new(self.catalog_repo.clone(), Box::new(DataCleanerImpl), defaults);

        let total_rows = rows.len();
        info!(total_rows, seller = %seller.name, "开始逐行处理");

        // === 步骤 2-4: 列映射 → 标准化 → upsert ===
        let mut outcomes = Vec::with_capacity(total_rows);
        let mut warnings = Vec::new();

        for (idx, raw_row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            match self.process_row(&upsert_service, &seller, raw_row, row_number) {
                Ok((outcome, row_warnings)) => {
                    outcomes.push(outcome);
                    warnings.extend(row_warnings);
                }
                Err(e) => {
                    error!(row_number, error = %e, "行处理失败，终止本次导入");
                    let batch = self.build_batch(
                        &batch_id,
                        seller_id,
                        &file_name,
                        total_rows,
                        &outcomes,
                        &warnings,
                        BatchStatus::Failed,
                        Some(e.to_string()),
                        start_time.elapsed(),
                    );
                    if let Err(record_err) = self.batch_repo.insert(&batch) {
                        error!(error = %record_err, "失败批次记录写入失败");
                    }
                    return Err(e);
                }
            }
        }

        // === 步骤 5: 批次记录 ===
        let elapsed_time = start_time.elapsed();
        let batch = self.build_batch(
            &batch_id,
            seller_id,
            &file_name,
            total_rows,
            &outcomes,
            &warnings,
            BatchStatus::Completed,
            None,
            elapsed_time,
        );
        self.batch_repo.insert(&batch)?;

        info!(
            success_rows = batch.success_rows,
            warning_rows = batch.warning_rows,
            elapsed_ms = batch.elapsed_ms,
            "导入完成"
        );

        Ok(ImportReport {
            batch,
            outcomes,
            warnings,
            elapsed_time,
        })
    }

    async fn batch_import(&self, jobs: Vec<(i64, PathBuf)>) -> Vec<ImportResult<ImportReport>> {
        use futures::future::join_all;

        info!(count = jobs.len(), "开始批量导入文件");

        let import_tasks = jobs.into_iter().map(|(seller_id, path)| async move {
            let path_str = path.display().to_string();
            match self.import_from_csv(seller_id, path.clone()).await {
                Ok(report) => {
                    info!(
                        file = %path_str,
                        success = report.success_rows(),
                        "文件导入成功"
                    );
                    Ok(report)
                }
                Err(e) => {
                    error!(file = %path_str, error = %e, "文件导入失败");
                    Err(e)
                }
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}

// 辅助方法
impl<C> CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 处理单行（映射 → 标准化 → 紧固件 → 挂牌）
    fn process_row(
        &self,
        upsert_service: &CatalogUpsertService,
        seller: &Seller,
        raw_row: &RawRow,
        row_number: usize,
    ) -> ImportResult<(RowOutcome, Vec<RowWarning>)> {
        let mapped = self.field_mapper.remap(raw_row, &seller.csv_mapping);
        let record = self.row_standardizer.standardize(&mapped, row_number)?;
        let fastener = upsert_service.upsert_fastener(&record, row_number)?;
        let (listing, warnings) = upsert_service.upsert_listing(
            seller.id,
            fastener.id,
            mapped.raw(CanonicalField::Price),
            mapped.raw(CanonicalField::Quantity),
            row_number,
        )?;

        debug!(row_number, product_id = %fastener.product_id, "行处理完成");
        Ok((
            RowOutcome {
                row_number,
                fastener,
                listing,
            },
            warnings,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_batch(
        &self,
        batch_id: &str,
        seller_id: i64,
        file_name: &Option<String>,
        total_rows: usize,
        outcomes: &[RowOutcome],
        warnings: &[RowWarning],
        status: BatchStatus,
        error_message: Option<String>,
        elapsed: Duration,
    ) -> ImportBatch {
        let warning_rows = warnings
            .iter()
            .map(|w| w.row_number)
            .collect::<BTreeSet<_>>()
            .len();

        ImportBatch {
            batch_id: batch_id.to_string(),
            seller_id,
            file_name: file_name.clone(),
            total_rows: total_rows as i64,
            success_rows: outcomes.len() as i64,
            warning_rows: warning_rows as i64,
            status,
            error_message,
            imported_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as i64,
        }
    }
}
