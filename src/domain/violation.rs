// ==========================================
// 医生值班排班系统 - 校验结果模型
// ==========================================
// 违规只覆盖硬约束（下限/上限/不可用），偏好命中仅统计
// 违规是建议性结论，不是错误
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::staff::StaffId;

/// 硬约束违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    /// 班次数低于下限
    MinUnmet {
        staff_index: usize,
        assigned: u32,
        min: u32,
    },
    /// 班次数超过上限
    MaxExceeded {
        staff_index: usize,
        assigned: u32,
        max: u32,
    },
    /// 在不可用日期被排班
    UnavailableViolation { staff_index: usize, day: usize },
}

impl Violation {
    pub fn staff_index(&self) -> usize {
        match self {
            Violation::MinUnmet { staff_index, .. }
            | Violation::MaxExceeded { staff_index, .. }
            | Violation::UnavailableViolation { staff_index, .. } => *staff_index,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Violation::MinUnmet { .. } => "MIN_UNMET",
            Violation::MaxExceeded { .. } => "MAX_EXCEEDED",
            Violation::UnavailableViolation { .. } => "UNAVAILABLE_VIOLATION",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MinUnmet { staff_index, assigned, min } => write!(
                f,
                "班次不足: staff_index={}, assigned={}, min={}",
                staff_index, assigned, min
            ),
            Violation::MaxExceeded { staff_index, assigned, max } => write!(
                f,
                "班次超限: staff_index={}, assigned={}, max={}",
                staff_index, assigned, max
            ),
            Violation::UnavailableViolation { staff_index, day } => write!(
                f,
                "不可用日期被排班: staff_index={}, day={}",
                staff_index,
                day + 1
            ),
        }
    }
}

/// 单人统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffTally {
    pub staff_index: usize,
    pub staff_id: StaffId,
    pub name: String,
    pub assigned: u32,       // 被排班天数
    pub preferred_hits: u32, // 排班且为偏好日期的天数
    pub double_days: u32,    // 同日连上两个班次的天数
}

/// 校验报告
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub tallies: Vec<StaffTally>,
    pub unfilled_slots: usize,
}

impl ValidationReport {
    /// 没有任何硬约束违规
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations_for(&self, staff_index: usize) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.staff_index() == staff_index)
    }

    pub fn tally_for(&self, staff_index: usize) -> Option<&StaffTally> {
        self.tallies.iter().find(|t| t.staff_index == staff_index)
    }
}
