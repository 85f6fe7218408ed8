// ==========================================
// 紧固件目录导入系统 - 导入层
// ==========================================
// 职责: 卖家 CSV 目录 → 标准化目录记录
// 支持: CSV
// ==========================================

// 模块声明
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod catalog_upsert;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod row_standardizer;

// 重导出核心类型
pub use catalog_importer_impl::CatalogImporterImpl;
pub use catalog_upsert::{CatalogUpsertService, ListingDefaults};
pub use data_cleaner::{title_case, DataCleaner as DataCleanerImpl};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::CsvParser;
pub use row_standardizer::{normalize_size_token, RowStandardizer};

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, DataCleaner, FieldMapper, FileParser, RawRow};
