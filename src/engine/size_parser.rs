// ==========================================
// 紧固件目录导入系统 - 螺纹规格解析
// ==========================================
// 职责: 识别公制 / 英制规格文本
// 公制: M<直径>-<螺距>     例 "M12-1.75"
// 英制: <直径>-<牙数>      例 "1/2-13"、"1-8"
// 顺序: 先公制后英制（公制以 M 开头，两种文法互斥）
// ==========================================

use crate::engine::error::{ThreadSizeError, ThreadSizeResult};
use regex::Regex;
use std::sync::LazyLock;

static METRIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M(\d+(?:\.\d+)?)-(\d+(?:\.\d+)?)$").expect("公制规格正则无效")
});

static IMPERIAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:/(\d+))?-(\d+)$").expect("英制规格正则无效")
});

/// 规格解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedThreadSize {
    /// 公制: 公称直径（mm）+ 螺距（原样透传为 thread_per_unit）
    Metric { diameter_mm: f64, pitch: f64 },
    /// 英制: 公称直径（inch，分数已求值）+ 每英寸牙数
    Imperial { diameter_in: f64, tpi: u32 },
}

/// 解析螺纹规格文本
///
/// # 返回
/// - Ok(ParsedThreadSize): 匹配公制或英制文法
/// - Err(InvalidFormat): 两种文法都不匹配（错误中携带原始文本）
/// - Err(OutOfRange): 英制分子/分母/牙数超出 u32
pub fn parse_thread_size(input: &str) -> ThreadSizeResult<ParsedThreadSize> {
    if let Some(parsed) = parse_metric(input) {
        return Ok(parsed);
    }
    if let Some(parsed) = parse_imperial(input) {
        return parsed;
    }
    Err(ThreadSizeError::InvalidFormat(input.to_string()))
}

fn parse_metric(input: &str) -> Option<ParsedThreadSize> {
    let caps = METRIC_PATTERN.captures(input)?;
    let diameter_mm = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let pitch = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(ParsedThreadSize::Metric { diameter_mm, pitch })
}

/// 文法不匹配返回 None；匹配后的数值错误返回 Some(Err)
fn parse_imperial(input: &str) -> Option<ThreadSizeResult<ParsedThreadSize>> {
    let caps = IMPERIAL_PATTERN.captures(input)?;
    let whole_or_numerator = caps.get(1)?.as_str();
    let denominator = caps.get(2).map(|m| m.as_str());
    let tpi = caps.get(3)?.as_str();
    Some(imperial_from_parts(input, whole_or_numerator, denominator, tpi))
}

fn imperial_from_parts(
    input: &str,
    whole_or_numerator: &str,
    denominator: Option<&str>,
    tpi: &str,
) -> ThreadSizeResult<ParsedThreadSize> {
    let whole_or_numerator = parse_count(input, "imperial_size_num", whole_or_numerator)?;
    let diameter_in = match denominator {
        Some(denominator) => {
            let denominator = parse_count(input, "imperial_size_num", denominator)?;
            if denominator == 0 {
                return Err(ThreadSizeError::InvalidFormat(input.to_string()));
            }
            f64::from(whole_or_numerator) / f64::from(denominator)
        }
        None => f64::from(whole_or_numerator),
    };
    let tpi = parse_count(input, "thread_per_unit", tpi)?;

    Ok(ParsedThreadSize::Imperial { diameter_in, tpi })
}

// 文法已保证纯数字，失败只可能是溢出
fn parse_count(input: &str, field: &'static str, digits: &str) -> ThreadSizeResult<u32> {
    digits.parse::<u32>().map_err(|_| ThreadSizeError::OutOfRange {
        size_str: input.to_string(),
        field,
    })
}
