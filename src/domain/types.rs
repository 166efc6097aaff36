// ==========================================
// 医生值班排班系统 - 领域类型定义
// ==========================================
// 职责: 排班周期键、交互模式、日期标记、上下限类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::calendar;

// ==========================================
// 排班周期键 (Period Key)
// ==========================================
// 年 + 从 0 开始的月份索引；每个自然月拥有独立的人员名单
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PeriodKey {
    year: i32,
    month0: u32,
}

impl PeriodKey {
    /// 创建周期键
    ///
    /// # 参数
    /// - year: 年份
    /// - month0: 月份索引（0 = 一月，11 = 十二月）
    ///
    /// # 返回
    /// - None: 月份索引越界
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 > 11 {
            return None;
        }
        Some(Self { year, month0 })
    }

    /// 以 1~12 的自然月份创建
    pub fn from_month(year: i32, month: u32) -> Option<Self> {
        month.checked_sub(1).and_then(|m0| Self::new(year, m0))
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// 自然月份（1~12）
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    /// 本周期天数
    pub fn days(&self) -> u32 {
        calendar::days_in_month(self.year, self.month0)
    }

    /// 上一个周期（一月 → 上一年十二月）
    pub fn previous(&self) -> Self {
        if self.month0 > 0 {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        } else {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        }
    }

    /// 下一个周期（十二月 → 下一年一月）
    pub fn next(&self) -> Self {
        if self.month0 < 11 {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        } else {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

// ==========================================
// 交互模式 (App Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppMode {
    #[default]
    EditingConstraints, // 约束编辑
    ViewingSchedule,    // 排班查看（只读）
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::EditingConstraints => write!(f, "EDITING_CONSTRAINTS"),
            AppMode::ViewingSchedule => write!(f, "VIEWING_SCHEDULE"),
        }
    }
}

// ==========================================
// 日期标记 (Day Mark)
// ==========================================
// 每人每天只能处于三种状态之一，点击按 偏好 → 不可用 → 中性 → 偏好 轮转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayMark {
    Preferred,
    Unavailable,
    Neutral,
}

impl DayMark {
    /// 轮转到下一个标记
    pub fn next(self) -> Self {
        match self {
            DayMark::Preferred => DayMark::Unavailable,
            DayMark::Unavailable => DayMark::Neutral,
            DayMark::Neutral => DayMark::Preferred,
        }
    }
}

impl fmt::Display for DayMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayMark::Preferred => write!(f, "PREFERRED"),
            DayMark::Unavailable => write!(f, "UNAVAILABLE"),
            DayMark::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

// ==========================================
// 班次上下限类型 (Bound Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundKind {
    Min,
    Max,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundKind::Min => write!(f, "MIN"),
            BoundKind::Max => write!(f, "MAX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key_bounds() {
        assert!(PeriodKey::new(2024, 11).is_some());
        assert!(PeriodKey::new(2024, 12).is_none());
        assert!(PeriodKey::from_month(2024, 0).is_none());
        assert_eq!(PeriodKey::from_month(2024, 3), PeriodKey::new(2024, 2));
    }

    #[test]
    fn test_period_navigation_wraps_year() {
        let jan = PeriodKey::new(2024, 0).unwrap();
        let dec = jan.previous();
        assert_eq!((dec.year(), dec.month0()), (2023, 11));
        assert_eq!(dec.next(), jan);

        let jun = PeriodKey::new(2024, 5).unwrap();
        assert_eq!(jun.next().month0(), 6);
        assert_eq!(jun.previous().month0(), 4);
    }

    #[test]
    fn test_period_display() {
        let p = PeriodKey::new(2025, 1).unwrap();
        assert_eq!(p.to_string(), "2025-02");
    }

    #[test]
    fn test_day_mark_cycle() {
        let mut mark = DayMark::Neutral;
        for _ in 0..3 {
            mark = mark.next();
        }
        assert_eq!(mark, DayMark::Neutral);
        assert_eq!(DayMark::Preferred.next(), DayMark::Unavailable);
    }
}
