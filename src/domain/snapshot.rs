// ==========================================
// 医生值班排班系统 - 日历快照（渲染契约）
// ==========================================
// 每次变更后输出，渲染端只订阅快照，不读取内部状态
// ==========================================

use serde::Serialize;

use crate::domain::schedule::SLOTS_PER_DAY;
use crate::domain::staff::StaffId;
use crate::domain::types::{AppMode, PeriodKey};
use crate::domain::violation::ValidationReport;

/// 名单中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffView {
    pub staff_id: StaffId,
    pub index: usize,
    pub name: String,
    pub min: u32,
    pub max: u32,
    pub prefer_double: bool,
    pub selected: bool,
    pub assigned: Option<u32>, // 仅查看模式下有值
}

/// 日历中的一天
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub day: usize, // 0 起
    pub slots: [Option<String>; SLOTS_PER_DAY],
    pub preferred: bool,   // 相对当前选中人员
    pub unavailable: bool, // 相对当前选中人员
    pub highlighted: [bool; SLOTS_PER_DAY],
}

impl DayView {
    pub fn is_filled(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|s| s.is_some())
    }
}

/// 日历快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarSnapshot {
    pub period: PeriodKey,
    pub mode: AppMode,
    pub leading_days: Vec<u32>,
    pub staff: Vec<StaffView>,
    pub days: Vec<DayView>,
    pub busy: bool,
    pub can_export: bool,
    pub can_clone_forward: bool,
    pub report: Option<ValidationReport>,
}

impl CalendarSnapshot {
    pub fn selected_staff(&self) -> Option<&StaffView> {
        self.staff.iter().find(|s| s.selected)
    }
}
