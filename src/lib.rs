// ==========================================
// 紧固件目录导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 卖家 CSV 目录 → 统一紧固件目录
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 螺纹规格解析与换算
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BatchStatus, CanonicalField, ReferenceKind, ThreadType, UnitType};

// 领域实体
pub use domain::{
    FastenerRecord, ImportBatch, ImportReport, Listing, MappedRow, NamedReference, NewSeller,
    RowWarning, Seller, SellerMapping, StandardizedRecord, ThreadDescriptor, ThreadSize,
};

// 引擎
pub use engine::{parse_thread_size, ThreadDescriptorBuilder, ThreadSizeError};

// API
pub use api::{ApiError, ApiResult, ImportApi, ImportApiResponse, SellerApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "紧固件目录导入系统";
