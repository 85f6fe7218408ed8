// ==========================================
// 紧固件目录导入系统 - 规格引擎层
// ==========================================
// 职责: 螺纹规格解析、单位换算、双制式描述构造
// 红线: 纯计算，不访问数据库
// ==========================================

pub mod error;
pub mod size_parser;
pub mod thread_descriptor;
pub mod unit_converter;

// 重导出核心引擎
pub use error::{ThreadSizeError, ThreadSizeResult};
pub use size_parser::{parse_thread_size, ParsedThreadSize};
pub use thread_descriptor::{
    imperial_to_metric_name, metric_to_imperial_name, validate_descriptor,
    ThreadDescriptorBuilder,
};
pub use unit_converter::{
    decimal_to_quarter_fraction, format_nominal, inches_to_millimeters, millimeters_to_inches,
    round_to_nearest_quarter, INCH_TO_MM,
};
