// ==========================================
// 紧固件目录导入系统 - 螺纹规格描述构造
// ==========================================
// 职责: 单一制式输入 → 公制/英制双向完整描述
// 流程: 解析 → 换算另一制式名义值 → 校验
// ==========================================

use crate::domain::thread_size::ThreadDescriptor;
use crate::domain::types::{ThreadType, UnitType};
use crate::engine::error::{ThreadSizeError, ThreadSizeResult};
use crate::engine::size_parser::{parse_thread_size, ParsedThreadSize};
use crate::engine::unit_converter::{
    decimal_to_quarter_fraction, format_nominal, inches_to_millimeters, millimeters_to_inches,
};

// ==========================================
// ThreadDescriptorBuilder
// ==========================================
pub struct ThreadDescriptorBuilder;

impl ThreadDescriptorBuilder {
    /// 由规格文本构造完整描述
    ///
    /// # 返回
    /// - Ok(ThreadDescriptor): 两侧投影均已填充
    /// - Err(InvalidFormat): 文法不匹配
    /// - Err(NonPositive): 权威直径或 thread_per_unit 非正
    pub fn build(&self, size_str: &str) -> ThreadSizeResult<ThreadDescriptor> {
        let descriptor = match parse_thread_size(size_str)? {
            ParsedThreadSize::Metric { diameter_mm, pitch } => {
                self.from_metric(size_str, diameter_mm, pitch)
            }
            ParsedThreadSize::Imperial { diameter_in, tpi } => {
                self.from_imperial(size_str, diameter_in, tpi)
            }
        };
        validate_descriptor(&descriptor)?;
        Ok(descriptor)
    }

    /// 公制输入 → 英制名义值
    ///
    /// 英制牙数借用 inch→mm 截断函数由螺距推得（螺距 × 25.4 向零截断）
    pub fn from_metric(&self, size_str: &str, diameter_mm: f64, pitch: f64) -> ThreadDescriptor {
        let imperial_size_num = millimeters_to_inches(diameter_mm);
        let derived_tpi = inches_to_millimeters(pitch);

        ThreadDescriptor {
            metric_size_str: size_str.to_string(),
            metric_size_num: diameter_mm,
            imperial_size_str: format!(
                "{}-{}",
                decimal_to_quarter_fraction(imperial_size_num),
                derived_tpi
            ),
            imperial_size_num,
            thread_per_unit: pitch,
            thread_type: ThreadType::Metric,
            unit: UnitType::Millimeter,
        }
    }

    /// 英制输入 → 公制名义值
    ///
    /// 公制直径为截断后的整数毫米，公制螺距由牙数经 mm→inch 函数按 1/4 取整推得
    pub fn from_imperial(&self, size_str: &str, diameter_in: f64, tpi: u32) -> ThreadDescriptor {
        let metric_size_num = inches_to_millimeters(diameter_in);
        let derived_pitch = millimeters_to_inches(f64::from(tpi));

        ThreadDescriptor {
            metric_size_str: format!("M{}-{}", metric_size_num, format_nominal(derived_pitch)),
            metric_size_num: metric_size_num as f64,
            imperial_size_str: size_str.to_string(),
            imperial_size_num: diameter_in,
            thread_per_unit: f64::from(tpi),
            thread_type: ThreadType::Imperial,
            unit: UnitType::Inch,
        }
    }
}

/// 校验描述（只校验输入制式一侧与 thread_per_unit）
pub fn validate_descriptor(descriptor: &ThreadDescriptor) -> ThreadSizeResult<()> {
    let size_field = match descriptor.thread_type {
        ThreadType::Metric => "metric_size_num",
        ThreadType::Imperial => "imperial_size_num",
    };
    let size = descriptor.authoritative_size();
    if size <= 0.0 {
        return Err(ThreadSizeError::NonPositive {
            size_str: descriptor.display_name().to_string(),
            field: size_field,
            value: size,
        });
    }

    if descriptor.thread_per_unit <= 0.0 {
        return Err(ThreadSizeError::NonPositive {
            size_str: descriptor.display_name().to_string(),
            field: "thread_per_unit",
            value: descriptor.thread_per_unit,
        });
    }

    Ok(())
}

/// 公制规格名 → 英制名义规格名（文法不匹配返回 None）
pub fn metric_to_imperial_name(metric_size_str: &str) -> Option<String> {
    match parse_thread_size(metric_size_str).ok()? {
        ParsedThreadSize::Metric { diameter_mm, pitch } => Some(
            ThreadDescriptorBuilder
                .from_metric(metric_size_str, diameter_mm, pitch)
                .imperial_size_str,
        ),
        ParsedThreadSize::Imperial { .. } => None,
    }
}

/// 英制规格名 → 公制名义规格名（文法不匹配返回 None）
pub fn imperial_to_metric_name(imperial_size_str: &str) -> Option<String> {
    match parse_thread_size(imperial_size_str).ok()? {
        ParsedThreadSize::Imperial { diameter_in, tpi } => Some(
            ThreadDescriptorBuilder
                .from_imperial(imperial_size_str, diameter_in, tpi)
                .metric_size_str,
        ),
        ParsedThreadSize::Metric { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::unit_converter::INCH_TO_MM;

    #[test]
    fn test_build_metric() {
        let descriptor = ThreadDescriptorBuilder.build("M12-1.75").unwrap();

        assert_eq!(descriptor.metric_size_str, "M12-1.75");
        assert_eq!(descriptor.metric_size_num, 12.0);
        assert_eq!(descriptor.imperial_size_num, 0.5);
        assert_eq!(descriptor.imperial_size_str, "1/2-44");
        assert_eq!(descriptor.thread_per_unit, 1.75);
        assert_eq!(descriptor.thread_type, ThreadType::Metric);
        assert_eq!(descriptor.unit, UnitType::Millimeter);
    }

    #[test]
    fn test_build_imperial() {
        let descriptor = ThreadDescriptorBuilder.build("1/2-13").unwrap();

        assert_eq!(descriptor.imperial_size_str, "1/2-13");
        assert_eq!(descriptor.imperial_size_num, 0.5);
        assert_eq!(descriptor.thread_per_unit, 13.0);
        assert_eq!(descriptor.metric_size_num, 12.0);
        assert_eq!(descriptor.metric_size_str, "M12-0.5");
        assert_eq!(descriptor.thread_type, ThreadType::Imperial);
        assert_eq!(descriptor.unit, UnitType::Inch);
    }

    #[test]
    fn test_build_imperial_whole_pitch_keeps_decimal() {
        // 25 / 25.4 = 0.984 → 1.0
        let descriptor = ThreadDescriptorBuilder.build("2-25").unwrap();
        assert_eq!(descriptor.metric_size_str, "M50-1.0");
        assert_eq!(descriptor.metric_size_num, 50.0);
    }

    #[test]
    fn test_build_small_metric_derives_zero_inch() {
        let descriptor = ThreadDescriptorBuilder.build("M3-0.5").unwrap();
        assert_eq!(descriptor.imperial_size_num, 0.0);
        assert_eq!(descriptor.imperial_size_str, "0-12");
    }

    #[test]
    fn test_build_invalid_format() {
        let err = ThreadDescriptorBuilder.build("invalid-size").unwrap_err();
        assert_eq!(err.to_string(), "螺纹规格格式无效: invalid-size");
    }

    #[test]
    fn test_build_zero_pitch_rejected() {
        let err = ThreadDescriptorBuilder.build("M12-0").unwrap_err();
        assert!(matches!(
            err,
            ThreadSizeError::NonPositive {
                field: "thread_per_unit",
                ..
            }
        ));
    }

    #[test]
    fn test_build_zero_diameter_rejected() {
        assert!(matches!(
            ThreadDescriptorBuilder.build("0-13"),
            Err(ThreadSizeError::NonPositive {
                field: "imperial_size_num",
                ..
            })
        ));
        assert!(matches!(
            ThreadDescriptorBuilder.build("M0-1"),
            Err(ThreadSizeError::NonPositive {
                field: "metric_size_num",
                ..
            })
        ));
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(imperial_to_metric_name("1/2-13").as_deref(), Some("M12-0.5"));
        assert_eq!(metric_to_imperial_name("M12-1.75").as_deref(), Some("1/2-44"));
        assert_eq!(metric_to_imperial_name("invalid-metric"), None);
        assert_eq!(metric_to_imperial_name("1/2-13"), None);
    }

    #[test]
    fn test_metric_round_trip_within_quarter() {
        for size in ["M6-1", "M8-1.25", "M10-1.5", "M12-1.75", "M16-2", "M20-2.5"] {
            let metric = ThreadDescriptorBuilder.build(size).unwrap();
            let imperial_name = metric.imperial_size_str.clone();
            let imperial = ThreadDescriptorBuilder.build(&imperial_name).unwrap();
            let metric_again = ThreadDescriptorBuilder
                .build(&imperial.metric_size_str)
                .unwrap();

            assert!(
                (metric_again.thread_per_unit - metric.thread_per_unit).abs() <= 0.25,
                "{} → {} → {}",
                size,
                imperial_name,
                imperial.metric_size_str
            );
            assert!(
                (metric_again.metric_size_num - metric.metric_size_num).abs() / INCH_TO_MM <= 0.25,
                "{} → {} → {}",
                size,
                imperial_name,
                imperial.metric_size_str
            );
        }

        let imperial = ThreadDescriptorBuilder.build("1/2-44").unwrap();
        assert_eq!(imperial.metric_size_str, "M12-1.75");
    }
}
