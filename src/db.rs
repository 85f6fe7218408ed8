// ==========================================
// 紧固件目录导入系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键 + busy_timeout）
// - 建表语句幂等，首次打开即可使用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS material (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS finish (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS category (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS thread_size (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    metric_size_str   TEXT NOT NULL,
    metric_size_num   REAL NOT NULL,
    imperial_size_str TEXT NOT NULL,
    imperial_size_num REAL NOT NULL,
    thread_per_unit   REAL NOT NULL CHECK (thread_per_unit > 0),
    thread_type       TEXT NOT NULL CHECK (thread_type IN ('metric', 'imperial')),
    unit              TEXT NOT NULL CHECK (unit IN ('millimeter', 'inch')),
    UNIQUE (metric_size_str, imperial_size_str)
);

CREATE TABLE IF NOT EXISTS fastener (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id     TEXT NOT NULL UNIQUE,
    description    TEXT NOT NULL,
    thread_size_id INTEGER NOT NULL REFERENCES thread_size(id),
    material_id    INTEGER NOT NULL REFERENCES material(id),
    finish_id      INTEGER NOT NULL REFERENCES finish(id),
    category_id    INTEGER NOT NULL REFERENCES category(id),
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seller (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,
    contact_email TEXT NOT NULL UNIQUE,
    phone_number  TEXT,
    address       TEXT,
    csv_mapping   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS seller_fastener (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    seller_id   INTEGER NOT NULL REFERENCES seller(id),
    fastener_id INTEGER NOT NULL REFERENCES fastener(id),
    price       REAL NOT NULL CHECK (price >= 0),
    quantity    INTEGER NOT NULL CHECK (quantity >= 0),
    updated_at  TEXT NOT NULL,
    UNIQUE (seller_id, fastener_id)
);

CREATE TABLE IF NOT EXISTS import_batch (
    batch_id      TEXT PRIMARY KEY,
    seller_id     INTEGER NOT NULL REFERENCES seller(id),
    file_name     TEXT,
    total_rows    INTEGER NOT NULL,
    success_rows  INTEGER NOT NULL,
    warning_rows  INTEGER NOT NULL,
    status        TEXT NOT NULL CHECK (status IN ('COMPLETED', 'FAILED')),
    error_message TEXT,
    imported_at   TEXT NOT NULL,
    elapsed_ms    INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_import_batch_seller ON import_batch(seller_id, imported_at);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id   TEXT NOT NULL,
    key        TEXT NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS schema_version (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 打开连接并建表
pub fn open_catalog_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
