// ==========================================
// 紧固件目录导入系统 - 螺纹规格领域模型
// ==========================================
// 职责: 螺纹规格描述（公制/英制双向投影）
// 去重键: (metric_size_str, imperial_size_str)
// ==========================================

use crate::domain::types::{ThreadType, UnitType};
use serde::{Deserialize, Serialize};

// ==========================================
// ThreadDescriptor - 螺纹规格描述
// ==========================================
// 红线: 输入制式一侧为权威值，另一侧为名义换算值
// 用途: 标准化阶段构造，仓储层按规格对去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadDescriptor {
    pub metric_size_str: String,   // 公制规格名（如 "M12-1.75"）
    pub metric_size_num: f64,      // 公制公称直径（mm）
    pub imperial_size_str: String, // 英制规格名（如 "1/2-13"）
    pub imperial_size_num: f64,    // 英制公称直径（inch）
    pub thread_per_unit: f64,      // 螺距（公制）或每英寸牙数（英制）
    pub thread_type: ThreadType,   // 输入制式
    pub unit: UnitType,            // 输入单位
}

impl ThreadDescriptor {
    /// 展示名称：取输入制式一侧的规格名
    pub fn display_name(&self) -> &str {
        match self.thread_type {
            ThreadType::Metric => &self.metric_size_str,
            ThreadType::Imperial => &self.imperial_size_str,
        }
    }

    /// 权威公称直径（输入制式一侧）
    pub fn authoritative_size(&self) -> f64 {
        match self.thread_type {
            ThreadType::Metric => self.metric_size_num,
            ThreadType::Imperial => self.imperial_size_num,
        }
    }
}

// ==========================================
// ThreadSize - 已落库的螺纹规格
// ==========================================
// 对齐: thread_size 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSize {
    pub id: i64,
    pub name: String,
    pub descriptor: ThreadDescriptor,
}
