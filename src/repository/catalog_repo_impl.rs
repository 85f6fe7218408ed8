// ==========================================
// 紧固件目录导入系统 - 目录 Repository 实现
// ==========================================
// 职责: 实现目录数据访问（使用 rusqlite）
// 去重: INSERT ... ON CONFLICT DO NOTHING + SELECT（依赖 UNIQUE 约束）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::fastener::{FastenerFields, FastenerRecord, Listing, NamedReference};
use crate::domain::thread_size::{ThreadDescriptor, ThreadSize};
use crate::domain::types::{ReferenceKind, ThreadType, UnitType};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const THREAD_SIZE_COLUMNS: &str = "id, name, metric_size_str, metric_size_num, imperial_size_str, \
     imperial_size_num, thread_per_unit, thread_type, unit";

const FASTENER_COLUMNS: &str = "id, product_id, description, thread_size_id, material_id, \
     finish_id, category_id, created_at, updated_at";

const LISTING_COLUMNS: &str = "id, seller_id, fastener_id, price, quantity, updated_at";

fn invalid_column(idx: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, format!("非法取值: {}", value).into())
}

fn map_thread_size(row: &Row) -> rusqlite::Result<ThreadSize> {
    let thread_type_raw: String = row.get(7)?;
    let unit_raw: String = row.get(8)?;
    Ok(ThreadSize {
        id: row.get(0)?,
        name: row.get(1)?,
        descriptor: ThreadDescriptor {
            metric_size_str: row.get(2)?,
            metric_size_num: row.get(3)?,
            imperial_size_str: row.get(4)?,
            imperial_size_num: row.get(5)?,
            thread_per_unit: row.get(6)?,
            thread_type: ThreadType::from_db_str(&thread_type_raw)
                .ok_or_else(|| invalid_column(7, &thread_type_raw))?,
            unit: UnitType::from_db_str(&unit_raw).ok_or_else(|| invalid_column(8, &unit_raw))?,
        },
    })
}

fn map_fastener(row: &Row) -> rusqlite::Result<FastenerRecord> {
    Ok(FastenerRecord {
        id: row.get(0)?,
        product_id: row.get(1)?,
        description: row.get(2)?,
        thread_size_id: row.get(3)?,
        material_id: row.get(4)?,
        finish_id: row.get(5)?,
        category_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn map_listing(row: &Row) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get(0)?,
        seller_id: row.get(1)?,
        fastener_id: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

// ==========================================
// CatalogRepositoryImpl
// ==========================================
pub struct CatalogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepositoryImpl {
    /// 创建新的 Repository 实例（打开连接并建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    fn select_fastener(conn: &Connection, product_id: &str) -> RepositoryResult<Option<FastenerRecord>> {
        let sql = format!("SELECT {} FROM fastener WHERE product_id = ?1", FASTENER_COLUMNS);
        let record = conn
            .query_row(&sql, params![product_id], map_fastener)
            .optional()?;
        Ok(record)
    }
}

impl CatalogRepository for CatalogRepositoryImpl {
    fn find_or_create_named_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> RepositoryResult<NamedReference> {
        let conn = self.get_conn()?;
        let table = kind.table_name();

        conn.execute(
            &format!("INSERT INTO {} (name) VALUES (?1) ON CONFLICT(name) DO NOTHING", table),
            params![name],
        )?;

        let id: i64 = conn.query_row(
            &format!("SELECT id FROM {} WHERE name = ?1", table),
            params![name],
            |row| row.get(0),
        )?;

        Ok(NamedReference {
            id,
            kind,
            name: name.to_string(),
        })
    }

    fn list_named_references(&self, kind: ReferenceKind) -> RepositoryResult<Vec<NamedReference>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name ASC",
            kind.table_name()
        ))?;

        let references = stmt
            .query_map([], |row| {
                Ok(NamedReference {
                    id: row.get(0)?,
                    kind,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(references)
    }

    fn find_or_create_thread_size(
        &self,
        name: &str,
        descriptor: &ThreadDescriptor,
    ) -> RepositoryResult<ThreadSize> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO thread_size (
                name, metric_size_str, metric_size_num, imperial_size_str,
                imperial_size_num, thread_per_unit, thread_type, unit
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(metric_size_str, imperial_size_str) DO NOTHING
            "#,
            params![
                name,
                descriptor.metric_size_str,
                descriptor.metric_size_num,
                descriptor.imperial_size_str,
                descriptor.imperial_size_num,
                descriptor.thread_per_unit,
                descriptor.thread_type.to_db_str(),
                descriptor.unit.to_db_str(),
            ],
        )?;

        let sql = format!(
            "SELECT {} FROM thread_size WHERE metric_size_str = ?1 AND imperial_size_str = ?2",
            THREAD_SIZE_COLUMNS
        );
        let thread_size = conn.query_row(
            &sql,
            params![descriptor.metric_size_str, descriptor.imperial_size_str],
            map_thread_size,
        )?;

        Ok(thread_size)
    }

    fn count_thread_sizes(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM thread_size", [], |row| row.get(0))?;
        Ok(count)
    }

    fn find_fastener(&self, product_id: &str) -> RepositoryResult<Option<FastenerRecord>> {
        let conn = self.get_conn()?;
        Self::select_fastener(&conn, product_id)
    }

    fn upsert_fastener(
        &self,
        product_id: &str,
        fields: &FastenerFields,
    ) -> RepositoryResult<FastenerRecord> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        let exists: bool = tx
            .query_row(
                "SELECT 1 FROM fastener WHERE product_id = ?1",
                params![product_id],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            tx.execute(
                r#"
                UPDATE fastener SET
                    description    = COALESCE(?2, description),
                    thread_size_id = COALESCE(?3, thread_size_id),
                    material_id    = COALESCE(?4, material_id),
                    finish_id      = COALESCE(?5, finish_id),
                    category_id    = COALESCE(?6, category_id),
                    updated_at     = ?7
                WHERE product_id = ?1
                "#,
                params![
                    product_id,
                    fields.description,
                    fields.thread_size_id,
                    fields.material_id,
                    fields.finish_id,
                    fields.category_id,
                    now,
                ],
            )?;
        } else {
            let missing = fields.missing_for_create();
            if !missing.is_empty() {
                return Err(RepositoryError::ValidationError(format!(
                    "创建紧固件 {} 缺少字段: {}",
                    product_id,
                    missing.join(", ")
                )));
            }

            tx.execute(
                r#"
                INSERT INTO fastener (
                    product_id, description, thread_size_id, material_id,
                    finish_id, category_id, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                "#,
                params![
                    product_id,
                    fields.description,
                    fields.thread_size_id,
                    fields.material_id,
                    fields.finish_id,
                    fields.category_id,
                    now,
                ],
            )?;
        }

        let record = Self::select_fastener(&tx, product_id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Fastener".to_string(),
            id: product_id.to_string(),
        })?;
        tx.commit()?;

        Ok(record)
    }

    fn count_fasteners(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM fastener", [], |row| row.get(0))?;
        Ok(count)
    }

    fn upsert_listing(
        &self,
        seller_id: i64,
        fastener_id: i64,
        price: f64,
        quantity: i64,
    ) -> RepositoryResult<Listing> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO seller_fastener (seller_id, fastener_id, price, quantity, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(seller_id, fastener_id) DO UPDATE SET
                price      = excluded.price,
                quantity   = excluded.quantity,
                updated_at = excluded.updated_at
            "#,
            params![seller_id, fastener_id, price, quantity, Utc::now()],
        )?;

        let sql = format!(
            "SELECT {} FROM seller_fastener WHERE seller_id = ?1 AND fastener_id = ?2",
            LISTING_COLUMNS
        );
        let listing = tx.query_row(&sql, params![seller_id, fastener_id], map_listing)?;
        tx.commit()?;

        Ok(listing)
    }

    fn find_listing(&self, seller_id: i64, fastener_id: i64) -> RepositoryResult<Option<Listing>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM seller_fastener WHERE seller_id = ?1 AND fastener_id = ?2",
            LISTING_COLUMNS
        );
        let listing = conn
            .query_row(&sql, params![seller_id, fastener_id], map_listing)
            .optional()?;
        Ok(listing)
    }

    fn count_listings(&self, seller_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM seller_fastener WHERE seller_id = ?1",
            params![seller_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ThreadDescriptorBuilder;

    fn setup() -> CatalogRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO seller (id, name, contact_email, csv_mapping) VALUES (1, 'Acme', 'ops@acme.test', '{}')",
            [],
        )
        .unwrap();
        CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn full_fields(repo: &CatalogRepositoryImpl) -> FastenerFields {
        let descriptor = ThreadDescriptorBuilder.build("M12-1.75").unwrap();
        let thread_size = repo.find_or_create_thread_size("M12-1.75", &descriptor).unwrap();
        FastenerFields {
            description: Some("HEX BOLT".to_string()),
            thread_size_id: Some(thread_size.id),
            material_id: Some(
                repo.find_or_create_named_reference(ReferenceKind::Material, "Steel")
                    .unwrap()
                    .id,
            ),
            finish_id: Some(
                repo.find_or_create_named_reference(ReferenceKind::Finish, "Zinc Plated")
                    .unwrap()
                    .id,
            ),
            category_id: Some(
                repo.find_or_create_named_reference(ReferenceKind::Category, "Bolt")
                    .unwrap()
                    .id,
            ),
        }
    }

    #[test]
    fn test_named_reference_is_idempotent() {
        let repo = setup();
        let first = repo
            .find_or_create_named_reference(ReferenceKind::Material, "Steel")
            .unwrap();
        let second = repo
            .find_or_create_named_reference(ReferenceKind::Material, "Steel")
            .unwrap();
        assert_eq!(first, second);

        // 不同种类互不影响
        let finish = repo
            .find_or_create_named_reference(ReferenceKind::Finish, "Steel")
            .unwrap();
        assert_eq!(finish.kind, ReferenceKind::Finish);
        assert_eq!(repo.list_named_references(ReferenceKind::Material).unwrap().len(), 1);
    }

    #[test]
    fn test_thread_size_dedup_by_pair() {
        let repo = setup();
        let descriptor = ThreadDescriptorBuilder.build("M12-1.75").unwrap();

        let first = repo.find_or_create_thread_size("M12-1.75", &descriptor).unwrap();
        let second = repo.find_or_create_thread_size("M12-1.75", &descriptor).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.descriptor, descriptor);
        assert_eq!(repo.count_thread_sizes().unwrap(), 1);
    }

    #[test]
    fn test_upsert_fastener_create_then_partial_update() {
        let repo = setup();
        let fields = full_fields(&repo);

        let created = repo.upsert_fastener("BOLT-001", &fields).unwrap();
        assert_eq!(created.description, "HEX BOLT");

        let update = FastenerFields {
            description: Some("HEX CAP SCREW".to_string()),
            ..Default::default()
        };
        let updated = repo.upsert_fastener("BOLT-001", &update).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "HEX CAP SCREW");
        assert_eq!(updated.material_id, created.material_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.count_fasteners().unwrap(), 1);
    }

    #[test]
    fn test_upsert_fastener_create_requires_all_fields() {
        let repo = setup();
        let fields = FastenerFields {
            description: Some("HEX BOLT".to_string()),
            ..Default::default()
        };

        let result = repo.upsert_fastener("BOLT-404", &fields);
        assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
        assert!(repo.find_fastener("BOLT-404").unwrap().is_none());
    }

    #[test]
    fn test_upsert_listing_last_write_wins() {
        let repo = setup();
        let fields = full_fields(&repo);
        let fastener = repo.upsert_fastener("BOLT-001", &fields).unwrap();

        let first = repo.upsert_listing(1, fastener.id, 0.25, 100).unwrap();
        let second = repo.upsert_listing(1, fastener.id, 0.3, 80).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.price, 0.3);
        assert_eq!(second.quantity, 80);
        assert_eq!(repo.count_listings(1).unwrap(), 1);
        assert_eq!(repo.find_listing(1, fastener.id).unwrap(), Some(second));
    }

    #[test]
    fn test_upsert_listing_unknown_seller_is_fk_violation() {
        let repo = setup();
        let fields = full_fields(&repo);
        let fastener = repo.upsert_fastener("BOLT-001", &fields).unwrap();

        let result = repo.upsert_listing(99, fastener.id, 1.0, 1);
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }
}
