// ==========================================
// 紧固件目录导入系统 - 导入批次仓储
// ==========================================
// 职责: 管理 import_batch 表（每次导入一条）
// ==========================================

use crate::domain::import::ImportBatch;
use crate::domain::types::BatchStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const BATCH_COLUMNS: &str = "batch_id, seller_id, file_name, total_rows, success_rows, \
     warning_rows, status, error_message, imported_at, elapsed_ms";

fn map_batch(row: &Row) -> rusqlite::Result<ImportBatch> {
    Ok(ImportBatch {
        batch_id: row.get(0)?,
        seller_id: row.get(1)?,
        file_name: row.get(2)?,
        total_rows: row.get(3)?,
        success_rows: row.get(4)?,
        warning_rows: row.get(5)?,
        status: BatchStatus::from_db_str(&row.get::<_, String>(6)?),
        error_message: row.get(7)?,
        imported_at: row.get(8)?,
        elapsed_ms: row.get(9)?,
    })
}

pub struct ImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportBatchRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_catalog_database(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入批次记录
    pub fn insert(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, seller_id, file_name, total_rows, success_rows,
                warning_rows, status, error_message, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                batch.batch_id,
                batch.seller_id,
                batch.file_name,
                batch.total_rows,
                batch.success_rows,
                batch.warning_rows,
                batch.status.to_db_str(),
                batch.error_message,
                batch.imported_at,
                batch.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, batch_id: &str) -> RepositoryResult<Option<ImportBatch>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM import_batch WHERE batch_id = ?1", BATCH_COLUMNS);
        let batch = conn.query_row(&sql, params![batch_id], map_batch).optional()?;
        Ok(batch)
    }

    /// 查询卖家最近的批次（按导入时间倒序）
    pub fn list_by_seller(&self, seller_id: i64, limit: usize) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM import_batch WHERE seller_id = ?1 ORDER BY imported_at DESC LIMIT ?2",
            BATCH_COLUMNS
        ))?;

        let batches = stmt
            .query_map(params![seller_id, limit as i64], map_batch)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn setup() -> ImportBatchRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO seller (id, name, contact_email, csv_mapping) VALUES (1, 'Acme', 'ops@acme.test', '{}')",
            [],
        )
        .unwrap();
        ImportBatchRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn batch(batch_id: &str, status: BatchStatus, minutes_ago: i64) -> ImportBatch {
        ImportBatch {
            batch_id: batch_id.to_string(),
            seller_id: 1,
            file_name: Some("catalog.csv".to_string()),
            total_rows: 3,
            success_rows: 2,
            warning_rows: 1,
            status,
            error_message: None,
            imported_at: Utc::now() - Duration::minutes(minutes_ago),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let repo = setup();
        let original = batch("b-1", BatchStatus::Completed, 0);
        repo.insert(&original).unwrap();

        let found = repo.find_by_id("b-1").unwrap().unwrap();
        assert_eq!(found, original);
        assert!(repo.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_by_seller_newest_first() {
        let repo = setup();
        repo.insert(&batch("older", BatchStatus::Completed, 10)).unwrap();
        repo.insert(&batch("newer", BatchStatus::Failed, 1)).unwrap();

        let batches = repo.list_by_seller(1, 10).unwrap();
        let ids: Vec<&str> = batches.iter().map(|b| b.batch_id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
        assert_eq!(batches[0].status, BatchStatus::Failed);
    }
}
