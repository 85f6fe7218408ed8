// ==========================================
// 紧固件目录导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_catalog_database;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

pub const DEFAULT_PRICE: f64 = 0.0;
pub const DEFAULT_QUANTITY: i64 = 0;
pub const DEFAULT_CSV_DELIMITER: u8 = b',';

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_catalog_database(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let conn_guard = Self::lock(&conn)?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(conn: &Arc<Mutex<Connection>>) -> ImportResult<MutexGuard<'_, Connection>> {
        conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: format!("锁获取失败: {}", e),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = Self::lock(&self.conn)?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(value)
    }

    /// 写入 global scope 配置（存在即覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = Self::lock(&self.conn)?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取 global scope 全部配置（按键排序）
    pub fn get_config_snapshot(&self) -> ImportResult<BTreeMap<String, String>> {
        let conn = Self::lock(&self.conn)?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1")?;
        let entries = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(entries)
    }

    /// 读取并解析配置值；非法值记录告警后回退默认值
    fn get_parsed_or_default<T, F>(&self, key: &str, default: T, parse: F) -> ImportResult<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => match parse(raw.trim()) {
                Some(value) => Ok(value),
                None => {
                    warn!(key = key, value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }
}

// ==========================================
// ImportConfigReader 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_default_price(&self) -> ImportResult<f64> {
        self.get_parsed_or_default(config_keys::DEFAULT_PRICE, DEFAULT_PRICE, |raw| {
            raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
        })
    }

    async fn get_default_quantity(&self) -> ImportResult<i64> {
        self.get_parsed_or_default(config_keys::DEFAULT_QUANTITY, DEFAULT_QUANTITY, |raw| {
            raw.parse::<i64>().ok().filter(|v| *v >= 0)
        })
    }

    async fn get_csv_delimiter(&self) -> ImportResult<u8> {
        self.get_parsed_or_default(config_keys::CSV_DELIMITER, DEFAULT_CSV_DELIMITER, |raw| {
            match raw {
                "\\t" | "tab" => Some(b'\t'),
                _ => match raw.as_bytes() {
                    [byte] if byte.is_ascii() => Some(*byte),
                    _ => None,
                },
            }
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 挂牌回退值
    pub const DEFAULT_PRICE: &str = "import.default_price";
    pub const DEFAULT_QUANTITY: &str = "import.default_quantity";

    // 文件解析
    pub const CSV_DELIMITER: &str = "import.csv_delimiter";
}
