// ==========================================
// 紧固件目录导入系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / 空白合并 / 大写 / 标题化 / 价格数量宽松解析
// ==========================================

use crate::importer::catalog_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_description(&self, value: &str) -> String {
        value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    }

    fn normalize_name(&self, value: &str) -> String {
        title_case(value.trim())
    }

    fn parse_price(&self, value: &str) -> Option<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| (v * 100.0).round_ties_even() / 100.0)
            // 极大值放大后溢出
            .filter(|v| v.is_finite())
    }

    fn parse_quantity(&self, value: &str) -> Option<i64> {
        value.trim().parse::<i64>().ok().filter(|v| *v >= 0)
    }
}

/// 标题化: 紧跟在非字母之后的字母大写，其余字母小写
///
/// # 示例
/// - "stainless steel" → "Stainless Steel"
/// - "ZINC-PLATED" → "Zinc-Plated"
/// - "18-8 ss" → "18-8 Ss"
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut prev_is_letter = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(ch);
            prev_is_letter = false;
        }
    }

    result
}
