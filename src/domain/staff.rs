// ==========================================
// 医生值班排班系统 - 人员约束领域模型
// ==========================================
// 硬约束: 不可用日期、班次上下限（校验器检查）
// 软偏好: 偏好日期、连班偏好（仅作为求解器提示）
// 红线: 同一天不可同时为偏好与不可用
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{BoundKind, DayMark};

// ==========================================
// StaffId - 人员稳定标识
// ==========================================
// 与显示顺序解耦；求解器边界上仍按名单顺序编码为索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(Uuid);

impl StaffId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StaffId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 硬约束（校验器强制检查）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardConstraints {
    pub unavailable_days: BTreeSet<u32>, // 不可排班日期（0 起）
    pub min: u32,                        // 最少班次数（含）
    pub max: u32,                        // 最多班次数（含）
}

/// 软偏好（不产生违规）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SoftPreferences {
    pub preferred_days: BTreeSet<u32>, // 偏好日期（0 起）
    pub prefer_double: bool,           // 偏好同日连上两个班次
}

/// 人员记录构造错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StaffRecordError {
    #[error("人员姓名不能为空")]
    EmptyName,

    #[error("日期同时为偏好与不可用: day={0}")]
    ConflictingDay(u32),
}

// ==========================================
// StaffRecord - 人员（某周期内）的排班约束
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffRecord {
    staff_id: StaffId,
    name: String,
    hard: HardConstraints,
    soft: SoftPreferences,
}

impl StaffRecord {
    /// 新建人员（日期集合为空，不偏好连班）
    ///
    /// 调用方负责保证 name 已 trim 且非空
    pub fn new(name: impl Into<String>, min: u32, max: u32) -> Self {
        Self {
            staff_id: StaffId::new(),
            name: name.into(),
            hard: HardConstraints {
                unavailable_days: BTreeSet::new(),
                min,
                max,
            },
            soft: SoftPreferences::default(),
        }
    }

    /// 从完整字段构造（导入场景）
    ///
    /// # 返回
    /// - Err(EmptyName): 姓名 trim 后为空
    /// - Err(ConflictingDay): 某天同时出现在偏好与不可用中
    pub fn from_parts(
        name: &str,
        preferred_days: impl IntoIterator<Item = u32>,
        unavailable_days: impl IntoIterator<Item = u32>,
        min: u32,
        max: u32,
        prefer_double: bool,
    ) -> Result<Self, StaffRecordError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StaffRecordError::EmptyName);
        }

        let preferred_days: BTreeSet<u32> = preferred_days.into_iter().collect();
        let unavailable_days: BTreeSet<u32> = unavailable_days.into_iter().collect();
        if let Some(day) = preferred_days.intersection(&unavailable_days).next() {
            return Err(StaffRecordError::ConflictingDay(*day));
        }

        Ok(Self {
            staff_id: StaffId::new(),
            name: name.to_string(),
            hard: HardConstraints {
                unavailable_days,
                min,
                max,
            },
            soft: SoftPreferences {
                preferred_days,
                prefer_double,
            },
        })
    }

    /// 检查记录自身一致性（姓名非空，偏好与不可用不相交）
    pub fn check(&self) -> Result<(), StaffRecordError> {
        if self.name.trim().is_empty() {
            return Err(StaffRecordError::EmptyName);
        }
        match self
            .soft
            .preferred_days
            .intersection(&self.hard.unavailable_days)
            .next()
        {
            Some(day) => Err(StaffRecordError::ConflictingDay(*day)),
            None => Ok(()),
        }
    }

    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> u32 {
        self.hard.min
    }

    pub fn max(&self) -> u32 {
        self.hard.max
    }

    pub fn prefer_double(&self) -> bool {
        self.soft.prefer_double
    }

    pub fn preferred_days(&self) -> &BTreeSet<u32> {
        &self.soft.preferred_days
    }

    pub fn unavailable_days(&self) -> &BTreeSet<u32> {
        &self.hard.unavailable_days
    }

    /// 最大日期索引（用于导入时的越界检查）
    pub fn max_marked_day(&self) -> Option<u32> {
        let p = self.soft.preferred_days.iter().next_back().copied();
        let u = self.hard.unavailable_days.iter().next_back().copied();
        p.max(u)
    }

    /// 某天的当前标记
    pub fn day_mark(&self, day: u32) -> DayMark {
        if self.soft.preferred_days.contains(&day) {
            DayMark::Preferred
        } else if self.hard.unavailable_days.contains(&day) {
            DayMark::Unavailable
        } else {
            DayMark::Neutral
        }
    }

    /// 三态轮转: 偏好 → 不可用 → 中性 → 偏好
    ///
    /// # 返回
    /// 轮转后的标记
    pub fn toggle_day(&mut self, day: u32) -> DayMark {
        let next = self.day_mark(day).next();
        match next {
            DayMark::Unavailable => {
                self.soft.preferred_days.remove(&day);
                self.hard.unavailable_days.insert(day);
            }
            DayMark::Neutral => {
                self.hard.unavailable_days.remove(&day);
            }
            DayMark::Preferred => {
                self.soft.preferred_days.insert(day);
            }
        }
        next
    }

    pub fn bound(&self, kind: BoundKind) -> u32 {
        match kind {
            BoundKind::Min => self.hard.min,
            BoundKind::Max => self.hard.max,
        }
    }

    /// 写入上限或下限（不强制 min ≤ max，由校验器暴露违规）
    pub fn set_bound(&mut self, kind: BoundKind, value: u32) {
        match kind {
            BoundKind::Min => self.hard.min = value,
            BoundKind::Max => self.hard.max = value,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_prefer_double(&mut self, prefer_double: bool) {
        self.soft.prefer_double = prefer_double;
    }

    /// 生成沿用到下一周期的副本
    ///
    /// 保留姓名、上下限、连班偏好；日期约束清空，分配新的 StaffId
    pub fn carried_forward(&self) -> Self {
        Self {
            staff_id: StaffId::new(),
            name: self.name.clone(),
            hard: HardConstraints {
                unavailable_days: BTreeSet::new(),
                min: self.hard.min,
                max: self.hard.max,
            },
            soft: SoftPreferences {
                preferred_days: BTreeSet::new(),
                prefer_double: self.soft.prefer_double,
            },
        }
    }
}

#[cfg(test)]
impl StaffRecord {
    /// 构造某天同时为偏好与不可用的记录
    pub(crate) fn with_conflicting_day(name: &str, day: u32) -> Self {
        let mut record = Self::new(name, 4, 8);
        record.soft.preferred_days.insert(day);
        record.hard.unavailable_days.insert(day);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_day_rotation() {
        let mut staff = StaffRecord::new("Curtis", 4, 8);

        assert_eq!(staff.toggle_day(3), DayMark::Preferred);
        assert!(staff.preferred_days().contains(&3));

        assert_eq!(staff.toggle_day(3), DayMark::Unavailable);
        assert!(!staff.preferred_days().contains(&3));
        assert!(staff.unavailable_days().contains(&3));

        assert_eq!(staff.toggle_day(3), DayMark::Neutral);
        assert!(staff.preferred_days().is_empty());
        assert!(staff.unavailable_days().is_empty());
    }

    #[test]
    fn test_from_parts_rejects_conflicts() {
        let err = StaffRecord::from_parts("Gill", [1, 2], [2, 3], 4, 6, false).unwrap_err();
        assert_eq!(err, StaffRecordError::ConflictingDay(2));

        let err = StaffRecord::from_parts("   ", Vec::<u32>::new(), Vec::<u32>::new(), 4, 6, false)
            .unwrap_err();
        assert_eq!(err, StaffRecordError::EmptyName);

        let ok = StaffRecord::from_parts(" Doan ", [1], [9], 2, 5, true).unwrap();
        assert_eq!(ok.name(), "Doan");
        assert_eq!(ok.max_marked_day(), Some(9));
    }

    #[test]
    fn test_check_catches_broken_records() {
        assert_eq!(StaffRecord::new("Gill", 4, 8).check(), Ok(()));
        assert_eq!(StaffRecord::new("  ", 4, 8).check(), Err(StaffRecordError::EmptyName));

        let staff = StaffRecord::with_conflicting_day("Gill", 5);
        assert_eq!(staff.check(), Err(StaffRecordError::ConflictingDay(5)));
    }

    #[test]
    fn test_carried_forward_clears_days() {
        let mut staff = StaffRecord::new("Hubbs", 3, 7);
        staff.set_prefer_double(true);
        staff.toggle_day(1);
        staff.toggle_day(2);
        staff.toggle_day(2);

        let copy = staff.carried_forward();
        assert_ne!(copy.staff_id(), staff.staff_id());
        assert_eq!(copy.name(), "Hubbs");
        assert_eq!((copy.min(), copy.max()), (3, 7));
        assert!(copy.prefer_double());
        assert!(copy.preferred_days().is_empty());
        assert!(copy.unavailable_days().is_empty());
    }

    #[test]
    fn test_set_bound_allows_inverted_range() {
        let mut staff = StaffRecord::new("Bowman", 4, 8);
        staff.set_bound(BoundKind::Min, 10);
        assert_eq!(staff.bound(BoundKind::Min), 10);
        assert_eq!(staff.bound(BoundKind::Max), 8);
    }
}
