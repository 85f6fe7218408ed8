// ==========================================
// 紧固件目录导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含换算逻辑
// ==========================================

pub mod fastener;
pub mod import;
pub mod seller;
pub mod thread_size;
pub mod types;

// 重导出核心类型
pub use fastener::{FastenerFields, FastenerRecord, Listing, NamedReference};
pub use import::{
    ImportBatch, ImportReport, MappedRow, RowOutcome, RowWarning, StandardizedRecord,
};
pub use seller::{MappingValidationError, NewSeller, Seller, SellerMapping};
pub use thread_size::{ThreadDescriptor, ThreadSize};
pub use types::{BatchStatus, CanonicalField, ReferenceKind, ThreadType, UnitType, REQUIRED_FIELDS};
