// ==========================================
// 目录导入API
// ==========================================
// 职责: 封装目录导入与批次查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::{ImportBatch, ImportReport, RowWarning};
use crate::importer::{CatalogImporter, CatalogImporterImpl, RawRow};
use crate::repository::{CatalogRepositoryImpl, ImportBatchRepository, SellerRepository};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入批次ID
    pub batch_id: String,
    pub seller_id: i64,
    /// 文件中的数据行数
    pub total_rows: i64,
    /// 落库成功的行数
    pub success_rows: i64,
    /// 含告警的行数
    pub warning_rows: i64,
    /// 告警明细（价格/数量回退）
    pub warnings: Vec<RowWarning>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            batch_id: report.batch.batch_id,
            seller_id: report.batch.seller_id,
            total_rows: report.batch.total_rows,
            success_rows: report.batch.success_rows,
            warning_rows: report.batch.warning_rows,
            warnings: report.warnings,
            elapsed_ms: report.elapsed_time.as_millis() as i64,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: CatalogImporterImpl<ConfigManager>,
    batch_repo: Arc<ImportBatchRepository>,
}

impl ImportApi {
    /// 打开数据库并创建 ImportApi
    pub fn new(db_path: &str) -> ApiResult<Self> {
        let conn = crate::db::open_catalog_database(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 共享已有连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone())?;
        let batch_repo = Arc::new(ImportBatchRepository::from_connection(conn.clone()));
        let importer = CatalogImporterImpl::new(
            Arc::new(CatalogRepositoryImpl::from_connection(conn.clone())),
            Arc::new(SellerRepository::from_connection(conn)),
            batch_repo.clone(),
            config,
        );

        Ok(Self {
            importer,
            batch_repo,
        })
    }

    /// 导入卖家 CSV 目录
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果
    /// - Err(RowRejected): 某行规格无效或必填字段缺失（之前的行已落库）
    /// - Err(InvalidInput): 文件不存在或格式不支持
    /// - Err(NotFound): 卖家不存在
    pub async fn import_catalog(&self, seller_id: i64, file_path: &str) -> ApiResult<ImportApiResponse> {
        let report = self.importer.import_from_csv(seller_id, file_path).await?;
        Ok(report.into())
    }

    /// 导入已解析的行
    pub async fn import_rows(
        &self,
        seller_id: i64,
        rows: Vec<RawRow>,
        file_name: Option<String>,
    ) -> ApiResult<ImportApiResponse> {
        let report = self.importer.import_rows(seller_id, rows, file_name).await?;
        Ok(report.into())
    }

    /// 批量导入（并发），结果顺序与入参一致
    pub async fn batch_import(&self, jobs: Vec<(i64, PathBuf)>) -> Vec<ApiResult<ImportApiResponse>> {
        self.importer
            .batch_import(jobs)
            .await
            .into_iter()
            .map(|result| result.map(ImportApiResponse::from).map_err(ApiError::from))
            .collect()
    }

    /// 查询导入批次
    pub fn get_batch(&self, batch_id: &str) -> ApiResult<ImportBatch> {
        self.batch_repo
            .find_by_id(batch_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ImportBatch(id={})不存在", batch_id)))
    }

    /// 查询卖家最近的导入批次
    pub fn list_batches(&self, seller_id: i64, limit: usize) -> ApiResult<Vec<ImportBatch>> {
        let limit = limit.clamp(1, 100);
        Ok(self.batch_repo.list_by_seller(seller_id, limit)?)
    }
}
