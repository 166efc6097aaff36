// ==========================================
// 医生值班排班系统 - 排班校验引擎
// ==========================================
// 输入: 排班结果 + 提交求解时的名单
// 输出: 硬约束违规列表 + 每人统计
// 红线: 纯函数，不修改排班与名单；名单或排班任一变化都需重跑
// ==========================================

use tracing::instrument;

use crate::domain::schedule::Assignment;
use crate::domain::staff::StaffRecord;
use crate::domain::violation::{StaffTally, ValidationReport, Violation};

// ==========================================
// ScheduleValidator - 排班校验引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScheduleValidator {
    // 无状态引擎
}

impl ScheduleValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验排班
    ///
    /// 对名单中每个人 p:
    /// 1) assigned = 任一槽位为 p 的天数
    /// 2) assigned < min → MinUnmet
    /// 3) assigned > max → MaxExceeded
    /// 4) 不可用日期被排班 → 每天一条 UnavailableViolation
    /// 5) 偏好日期命中只计数
    #[instrument(skip_all, fields(days = assignment.len(), staff = roster.len()))]
    pub fn validate(&self, assignment: &Assignment, roster: &[StaffRecord]) -> ValidationReport {
        let mut violations = Vec::new();
        let mut tallies = Vec::with_capacity(roster.len());

        for (index, staff) in roster.iter().enumerate() {
            let assigned = assignment.count_assigned(index);

            if assigned < staff.min() {
                violations.push(Violation::MinUnmet {
                    staff_index: index,
                    assigned,
                    min: staff.min(),
                });
            }
            if assigned > staff.max() {
                violations.push(Violation::MaxExceeded {
                    staff_index: index,
                    assigned,
                    max: staff.max(),
                });
            }

            for &day in staff.unavailable_days() {
                if assignment.is_assigned(index, day as usize) {
                    violations.push(Violation::UnavailableViolation {
                        staff_index: index,
                        day: day as usize,
                    });
                }
            }

            let preferred_hits = staff
                .preferred_days()
                .iter()
                .filter(|&&day| assignment.is_assigned(index, day as usize))
                .count() as u32;

            tallies.push(StaffTally {
                staff_index: index,
                staff_id: staff.staff_id(),
                name: staff.name().to_string(),
                assigned,
                preferred_hits,
                double_days: assignment.double_days(index),
            });
        }

        if !violations.is_empty() {
            tracing::debug!(count = violations.len(), "排班存在硬约束违规");
        }

        ValidationReport {
            violations,
            tallies,
            unfilled_slots: assignment.unfilled_slots(),
        }
    }
}
