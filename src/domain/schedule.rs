// ==========================================
// 医生值班排班系统 - 排班结果领域模型
// ==========================================
// 每天两个班次槽位，槽位值为名单索引或未填
// 红线: 索引只在提交求解时的名单下有效，名单变更后必须丢弃
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 每日班次槽位数（白班/夜班）
pub const SLOTS_PER_DAY: usize = 2;

/// 单日排班: 每个槽位为名单索引或 None（未填）
pub type DayShifts = [Option<usize>; SLOTS_PER_DAY];

/// 排班结果与名单不匹配
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentMismatch {
    #[error("排班天数不匹配: expected={expected}, actual={actual}")]
    DayCount { expected: usize, actual: usize },

    #[error("人员索引越界: day={day}, slot={slot}, index={index}, staff_count={staff_count}")]
    StaffIndexOutOfRange {
        day: usize,
        slot: usize,
        index: usize,
        staff_count: usize,
    },
}

// ==========================================
// Assignment - 月度排班
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    days: Vec<DayShifts>,
}

impl Assignment {
    pub fn new(days: Vec<DayShifts>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[DayShifts] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// 某人某天是否在任一槽位
    pub fn is_assigned(&self, staff_index: usize, day: usize) -> bool {
        self.days
            .get(day)
            .is_some_and(|slots| slots.contains(&Some(staff_index)))
    }

    /// 某人被排班的日期（任一槽位即计入，同日两槽位只计一次）
    pub fn assigned_days(&self, staff_index: usize) -> impl Iterator<Item = usize> + '_ {
        self.days
            .iter()
            .enumerate()
            .filter(move |(_, slots)| slots.contains(&Some(staff_index)))
            .map(|(day, _)| day)
    }

    pub fn count_assigned(&self, staff_index: usize) -> u32 {
        self.assigned_days(staff_index).count() as u32
    }

    /// 某人占用的 (日期, 槽位)，用于查看模式高亮
    pub fn slots_of(&self, staff_index: usize) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (day, slots) in self.days.iter().enumerate() {
            for (slot, value) in slots.iter().enumerate() {
                if *value == Some(staff_index) {
                    cells.push((day, slot));
                }
            }
        }
        cells
    }

    /// 同日两个槽位均为此人的天数
    pub fn double_days(&self, staff_index: usize) -> u32 {
        self.days
            .iter()
            .filter(|slots| slots.iter().all(|v| *v == Some(staff_index)))
            .count() as u32
    }

    /// 未填槽位总数
    pub fn unfilled_slots(&self) -> usize {
        self.days
            .iter()
            .flat_map(|slots| slots.iter())
            .filter(|v| v.is_none())
            .count()
    }

    /// 检查排班与名单是否匹配（天数 + 索引范围）
    ///
    /// 名单增删后持有的排班会在这里被识别为失效
    pub fn check_against(&self, staff_count: usize, days: usize) -> Result<(), AssignmentMismatch> {
        if self.days.len() != days {
            return Err(AssignmentMismatch::DayCount {
                expected: days,
                actual: self.days.len(),
            });
        }
        for (day, slots) in self.days.iter().enumerate() {
            for (slot, value) in slots.iter().enumerate() {
                if let Some(index) = *value {
                    if index >= staff_count {
                        return Err(AssignmentMismatch::StaffIndexOutOfRange {
                            day,
                            slot,
                            index,
                            staff_count,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignment {
        Assignment::new(vec![
            [Some(0), Some(1)],
            [Some(1), Some(1)],
            [None, Some(0)],
            [None, None],
        ])
    }

    #[test]
    fn test_counts() {
        let a = sample();
        assert_eq!(a.count_assigned(0), 2);
        assert_eq!(a.count_assigned(1), 2);
        assert_eq!(a.double_days(1), 1);
        assert_eq!(a.unfilled_slots(), 3);
        assert!(a.is_assigned(0, 2));
        assert!(!a.is_assigned(0, 3));
        assert!(!a.is_assigned(0, 99));
    }

    #[test]
    fn test_slots_of() {
        let a = sample();
        assert_eq!(a.slots_of(0), vec![(0, 0), (2, 1)]);
        assert_eq!(a.slots_of(1), vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_check_against() {
        let a = sample();
        assert!(a.check_against(2, 4).is_ok());
        assert_eq!(
            a.check_against(2, 5),
            Err(AssignmentMismatch::DayCount {
                expected: 5,
                actual: 4
            })
        );
        assert!(matches!(
            a.check_against(1, 4),
            Err(AssignmentMismatch::StaffIndexOutOfRange {
                day: 0,
                slot: 1,
                index: 1,
                ..
            })
        ));
    }
}
