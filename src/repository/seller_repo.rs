// ==========================================
// 紧固件目录导入系统 - 卖家数据仓储
// ==========================================
// 职责: 管理 seller 表的 CRUD 操作
// 存储: csv_mapping 以 JSON 文本保存
// 红线: Repository 不含业务逻辑（映射校验在 API 层）
// ==========================================

use crate::domain::seller::{NewSeller, Seller, SellerMapping};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELLER_COLUMNS: &str = "id, name, contact_email, phone_number, address, csv_mapping";

/// 行 → (Seller 除映射外字段, 原始映射 JSON)
fn map_seller_row(row: &Row) -> rusqlite::Result<(Seller, String)> {
    Ok((
        Seller {
            id: row.get(0)?,
            name: row.get(1)?,
            contact_email: row.get(2)?,
            phone_number: row.get(3)?,
            address: row.get(4)?,
            csv_mapping: SellerMapping::default(),
        },
        row.get(5)?,
    ))
}

fn attach_mapping((mut seller, raw_mapping): (Seller, String)) -> RepositoryResult<Seller> {
    seller.csv_mapping = serde_json::from_str(&raw_mapping)?;
    Ok(seller)
}

// ==========================================
// SellerRepository - 卖家仓储
// ==========================================
pub struct SellerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SellerRepository {
    /// 创建新的 SellerRepository 实例（打开连接并建表）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_catalog_database(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建卖家
    ///
    /// # 返回
    /// - Ok(Seller): 新建记录（含自增 id）
    /// - Err(UniqueConstraintViolation): name 或 contact_email 重复
    pub fn create(&self, seller: &NewSeller) -> RepositoryResult<Seller> {
        let mapping_json = serde_json::to_string(&seller.csv_mapping)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO seller (name, contact_email, phone_number, address, csv_mapping)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                seller.name,
                seller.contact_email,
                seller.phone_number,
                seller.address,
                mapping_json,
            ],
        )?;

        Ok(Seller {
            id: conn.last_insert_rowid(),
            name: seller.name.clone(),
            contact_email: seller.contact_email.clone(),
            phone_number: seller.phone_number.clone(),
            address: seller.address.clone(),
            csv_mapping: seller.csv_mapping.clone(),
        })
    }

    /// 按 id 查询
    ///
    /// # 返回
    /// - Ok(Some(Seller)): 找到卖家
    /// - Ok(None): 未找到
    /// - Err: 数据库错误或映射 JSON 损坏
    pub fn find_by_id(&self, seller_id: i64) -> RepositoryResult<Option<Seller>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM seller WHERE id = ?1", SELLER_COLUMNS);
        let row = conn.query_row(&sql, params![seller_id], map_seller_row).optional()?;
        row.map(attach_mapping).transpose()
    }

    /// 查询全部卖家（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Seller>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM seller ORDER BY id ASC", SELLER_COLUMNS))?;
        let rows = stmt
            .query_map([], map_seller_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(attach_mapping).collect()
    }

    /// 替换卖家列映射
    pub fn update_mapping(&self, seller_id: i64, mapping: &SellerMapping) -> RepositoryResult<()> {
        let mapping_json = serde_json::to_string(mapping)?;
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE seller SET csv_mapping = ?2 WHERE id = ?1",
            params![seller_id, mapping_json],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Seller".to_string(),
                id: seller_id.to_string(),
            });
        }
        Ok(())
    }
}
