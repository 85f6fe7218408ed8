// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、卖家登记、CSV 文件生成
// ==========================================

#![allow(dead_code)]

use fastener_catalog::api::SellerApi;
use fastener_catalog::domain::{CanonicalField, NewSeller, Seller, SellerMapping};
use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = fastener_catalog::db::open_catalog_database(&db_path)?;
    drop(conn);

    Ok((temp_file, db_path))
}

/// 测试卖家的标准列映射（与 fixtures/acme_catalog.csv 表头一致）
pub fn acme_mapping() -> SellerMapping {
    SellerMapping::new(BTreeMap::from([
        ("Part No".to_string(), CanonicalField::ProductId),
        ("Desc".to_string(), CanonicalField::Description),
        ("Size".to_string(), CanonicalField::ThreadSize),
        ("Mat".to_string(), CanonicalField::Material),
        ("Coating".to_string(), CanonicalField::Finish),
        ("Type".to_string(), CanonicalField::Category),
        ("Unit Price".to_string(), CanonicalField::Price),
        ("Stock".to_string(), CanonicalField::Quantity),
    ]))
}

pub fn new_seller(name: &str, email: &str) -> NewSeller {
    NewSeller {
        name: name.to_string(),
        contact_email: email.to_string(),
        phone_number: None,
        address: None,
        csv_mapping: acme_mapping(),
    }
}

/// 登记测试卖家
pub fn seed_seller(db_path: &str, name: &str, email: &str) -> Result<Seller, Box<dyn Error>> {
    let api = SellerApi::new(db_path)?;
    Ok(api.register_seller(new_seller(name, email))?)
}

/// 在临时目录中写入 CSV 文件
pub fn write_csv(dir: &TempDir, file_name: &str, content: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(file_name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}

/// 标准表头
pub const ACME_HEADER: &str = "Part No,Desc,Size,Mat,Coating,Type,Unit Price,Stock";
