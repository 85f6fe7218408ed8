// ==========================================
// 紧固件目录导入系统 - 单位换算
// ==========================================
// 职责: 毫米 ↔ 英寸换算、1/4 步进取整、分数表示
// 约束: 纯函数，无副作用
// ==========================================
// 注意: inch→mm 截断取整，mm→inch 按 1/4 四舍五入（银行家舍入）
// 两者不对称，名义规格输出依赖这一行为，不要统一
// ==========================================

/// 1 英寸 = 25.4 毫米
pub const INCH_TO_MM: f64 = 25.4;

/// 英寸 → 毫米（向零截断为整数毫米）
///
/// # 示例
/// - 1.0 → 25
/// - 0.5 → 12
pub fn inches_to_millimeters(inches: f64) -> i64 {
    (inches * INCH_TO_MM).trunc() as i64
}

/// 毫米 → 英寸（先保留 3 位小数，再取最近的 1/4）
///
/// # 示例
/// - 25.4 → 1.0
/// - 12.7 → 0.5
pub fn millimeters_to_inches(mm: f64) -> f64 {
    round_to_nearest_quarter(round_to_places(mm / INCH_TO_MM, 3))
}

/// 取最近的 1/4（ties-to-even）
pub fn round_to_nearest_quarter(value: f64) -> f64 {
    (value * 4.0).round_ties_even() / 4.0
}

/// 小数 → 1/4 步进的带分数字符串
///
/// # 格式
/// - 整数与分数部分均非零: "W N/D"（如 "1 1/4"）
/// - 仅分数部分: "N/D"（如 "3/4"）
/// - 仅整数部分: "W"（含 "0"）
pub fn decimal_to_quarter_fraction(value: f64) -> String {
    let quarters = (round_to_nearest_quarter(value) * 4.0) as i64;
    let whole = quarters / 4;
    let remainder = quarters % 4;

    if remainder == 0 {
        return whole.to_string();
    }

    let divisor = gcd(remainder.abs(), 4);
    let numerator = remainder / divisor;
    let denominator = 4 / divisor;

    if whole > 0 {
        format!("{} {}/{}", whole, numerator, denominator)
    } else {
        format!("{}/{}", numerator, denominator)
    }
}

/// 规格名中的换算数值格式: 整数保留一位小数（"1.0"），其余取最短表示（"0.5"）
pub fn format_nominal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
