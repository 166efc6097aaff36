// ==========================================
// 医生值班排班系统 - 日历计算
// ==========================================
// 职责: 月天数（含闰年）、月首星期偏移、首行补位日期
// ==========================================

use chrono::{Datelike, NaiveDate};

use crate::domain::types::PeriodKey;

const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// 是否闰年（格里高利历）
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 指定月份的天数
///
/// # 参数
/// - month0: 从 0 开始的月份索引，越界返回 0
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    if month0 == 1 && is_leap_year(year) {
        return 29;
    }
    DAYS_PER_MONTH.get(month0 as usize).copied().unwrap_or(0)
}

/// 月首是星期几（周日 = 0）
///
/// 日历首行从周日开始，返回值即首行需要补位的天数
pub fn leading_weekday_offset(period: PeriodKey) -> u32 {
    NaiveDate::from_ymd_opt(period.year(), period.month(), 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// 首行补位日期（上个月末尾的日号，1 起）
///
/// 例: 2024-05-01 为周三，返回上月的 [28, 29, 30]
pub fn leading_padding_days(period: PeriodKey) -> Vec<u32> {
    let offset = leading_weekday_offset(period);
    let prev_days = period.previous().days();
    (0..offset).map(|i| prev_days - offset + i + 1).collect()
}
