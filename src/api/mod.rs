// ==========================================
// 紧固件目录导入系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 与嵌入方调用
// ==========================================

pub mod error;
pub mod import_api;
pub mod seller_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
pub use seller_api::SellerApi;
