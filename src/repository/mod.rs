// ==========================================
// 紧固件目录导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,表名仅来自固定白名单
// ==========================================

pub mod catalog_repo;
pub mod catalog_repo_impl;
pub mod error;
pub mod import_batch_repo;
pub mod seller_repo;

// 重导出核心仓储
pub use catalog_repo::CatalogRepository;
pub use catalog_repo_impl::CatalogRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
pub use import_batch_repo::ImportBatchRepository;
pub use seller_repo::SellerRepository;
