// ==========================================
// 紧固件目录导入系统 - 命令行入口
// ==========================================
// 用法:
//   fastener-catalog register-seller <seller.json>
//   fastener-catalog import <seller_id> <file.csv> [<seller_id> <file.csv> ...]
//   fastener-catalog batches <seller_id> [limit]
//   fastener-catalog convert <size>
//   fastener-catalog config show
//   fastener-catalog config set <key> <value>
//
// 数据库路径: FASTENER_CATALOG_DB，未设置时使用用户数据目录
// ==========================================

use anyhow::{bail, Context, Result};
use fastener_catalog::api::{ImportApi, SellerApi};
use fastener_catalog::config::ConfigManager;
use fastener_catalog::domain::NewSeller;
use fastener_catalog::engine::ThreadDescriptorBuilder;
use fastener_catalog::logging;
use std::path::PathBuf;
use tracing::{error, info};

const USAGE: &str = "\
用法:
  fastener-catalog register-seller <seller.json>
  fastener-catalog import <seller_id> <file.csv> [<seller_id> <file.csv> ...]
  fastener-catalog batches <seller_id> [limit]
  fastener-catalog convert <size>
  fastener-catalog config show
  fastener-catalog config set <key> <value>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("缺少子命令\n{}", USAGE);
    };

    match command.as_str() {
        "convert" => convert(rest),
        "register-seller" => register_seller(&default_db_path()?, rest),
        "import" => import(&default_db_path()?, rest).await,
        "batches" => list_batches(&default_db_path()?, rest),
        "config" => config(&default_db_path()?, rest),
        other => bail!("未知子命令: {}\n{}", other, USAGE),
    }
}

/// 数据库路径
///
/// 优先读取 FASTENER_CATALOG_DB；否则落在用户数据目录下
fn default_db_path() -> Result<String> {
    if let Ok(path) = std::env::var("FASTENER_CATALOG_DB") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    let mut path = PathBuf::from("./fastener_catalog.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("fastener-catalog");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("无法创建数据目录: {}", dir.display()))?;
        path = dir.join("catalog.db");
    }

    Ok(path.to_string_lossy().to_string())
}

fn convert(args: &[String]) -> Result<()> {
    let [size] = args else {
        bail!("convert 需要一个规格参数\n{}", USAGE);
    };

    let descriptor = ThreadDescriptorBuilder.build(size.trim())?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

fn register_seller(db_path: &str, args: &[String]) -> Result<()> {
    let [file] = args else {
        bail!("register-seller 需要一个 JSON 文件参数\n{}", USAGE);
    };

    let content =
        std::fs::read_to_string(file).with_context(|| format!("无法读取卖家文件: {}", file))?;
    let new_seller: NewSeller =
        serde_json::from_str(&content).with_context(|| format!("卖家文件格式错误: {}", file))?;

    let api = SellerApi::new(db_path)?;
    let seller = api.register_seller(new_seller)?;
    println!("{}", serde_json::to_string_pretty(&seller)?);
    Ok(())
}

async fn import(db_path: &str, args: &[String]) -> Result<()> {
    if args.is_empty() || args.len() % 2 != 0 {
        bail!("import 需要成对的 <seller_id> <file.csv> 参数\n{}", USAGE);
    }

    let mut jobs = Vec::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        let seller_id: i64 = pair[0]
            .parse()
            .with_context(|| format!("seller_id 不是整数: {}", pair[0]))?;
        jobs.push((seller_id, PathBuf::from(&pair[1])));
    }

    let api = ImportApi::new(db_path)?;
    let results = api.batch_import(jobs.clone()).await;

    let mut failed = 0usize;
    for ((seller_id, path), result) in jobs.iter().zip(results) {
        match result {
            Ok(response) => {
                info!(
                    seller_id,
                    file = %path.display(),
                    batch_id = %response.batch_id,
                    "导入完成"
                );
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Err(e) => {
                failed += 1;
                error!(seller_id, file = %path.display(), error = %e, "导入失败");
            }
        }
    }

    if failed > 0 {
        bail!("{} 个文件导入失败", failed);
    }
    Ok(())
}

fn list_batches(db_path: &str, args: &[String]) -> Result<()> {
    let (seller_id, limit) = match args {
        [seller_id] => (seller_id, 20),
        [seller_id, limit] => (
            seller_id,
            limit
                .parse::<usize>()
                .with_context(|| format!("limit 不是整数: {}", limit))?,
        ),
        _ => bail!("batches 参数错误\n{}", USAGE),
    };
    let seller_id: i64 = seller_id
        .parse()
        .with_context(|| format!("seller_id 不是整数: {}", seller_id))?;

    let api = ImportApi::new(db_path)?;
    let batches = api.list_batches(seller_id, limit)?;
    println!("{}", serde_json::to_string_pretty(&batches)?);
    Ok(())
}

fn config(db_path: &str, args: &[String]) -> Result<()> {
    let manager = ConfigManager::new(db_path)?;

    match args {
        [action] if action == "show" => {
            let snapshot = manager.get_config_snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        [action, key, value] if action == "set" => {
            manager.set_global_config_value(key, value)?;
            info!(key = %key, value = %value, "配置已更新");
        }
        _ => bail!("config 参数错误\n{}", USAGE),
    }

    Ok(())
}
