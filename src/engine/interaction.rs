// ==========================================
// 医生值班排班系统 - 交互状态机
// ==========================================
// 状态: EditingConstraints（初始）/ ViewingSchedule（只读）
// 只持有 StaffId 与排班副本，不复制人员数据
// ==========================================
// 迁移规则:
// - 选择人员: 同一人再次选择即取消，选择他人即切换
// - 点击日期: 仅编辑模式且有选中人员时生效
// - 发起求解: 清空选中
// - 求解成功: 进入查看模式并持有排班
// - 求解无解: 回到编辑模式，丢弃排班
// - 名单变更: 回到编辑模式，丢弃排班
// - 切换周期: 全部重置
// ==========================================

use serde::Serialize;

use crate::domain::schedule::Assignment;
use crate::domain::staff::StaffId;
use crate::domain::types::AppMode;

/// 一次命令造成的状态变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Transition {
    pub mode_changed: bool,
    pub selection_changed: bool,
    pub assignment_discarded: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        !(self.mode_changed || self.selection_changed || self.assignment_discarded)
    }

    fn merge(self, other: Transition) -> Transition {
        Transition {
            mode_changed: self.mode_changed || other.mode_changed,
            selection_changed: self.selection_changed || other.selection_changed,
            assignment_discarded: self.assignment_discarded || other.assignment_discarded,
        }
    }
}

// ==========================================
// InteractionState - 交互状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    mode: AppMode,
    selected: Option<StaffId>,
    assignment: Option<Assignment>,
}

impl InteractionState {
    /// 初始状态: 编辑模式，无选中，无排班
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn selected(&self) -> Option<StaffId> {
        self.selected
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn is_viewing(&self) -> bool {
        self.mode == AppMode::ViewingSchedule
    }

    /// 选择 / 取消选择人员
    pub fn select_staff(&mut self, staff_id: StaffId) -> Transition {
        self.selected = if self.selected == Some(staff_id) {
            None
        } else {
            Some(staff_id)
        };
        Transition {
            selection_changed: true,
            ..Transition::default()
        }
    }

    pub fn clear_selection(&mut self) -> Transition {
        Transition {
            selection_changed: self.selected.take().is_some(),
            ..Transition::default()
        }
    }

    /// 日期点击的目标人员
    ///
    /// # 返回
    /// - None: 查看模式或未选中人员，点击应被忽略
    pub fn day_click_target(&self) -> Option<StaffId> {
        match self.mode {
            AppMode::EditingConstraints => self.selected,
            AppMode::ViewingSchedule => None,
        }
    }

    /// 发起求解前: 清空选中
    pub fn begin_request(&mut self) -> Transition {
        self.clear_selection()
    }

    /// 求解成功: 进入查看模式
    pub fn enter_viewing(&mut self, assignment: Assignment) -> Transition {
        let mode_changed = self.mode != AppMode::ViewingSchedule;
        let replaced = self.assignment.replace(assignment).is_some();
        self.mode = AppMode::ViewingSchedule;
        Transition {
            mode_changed,
            assignment_discarded: replaced,
            ..Transition::default()
        }
    }

    /// 求解无解: 回到编辑模式并丢弃旧排班（导出入口随之失效）
    pub fn on_infeasible(&mut self) -> Transition {
        self.back_to_editing()
    }

    /// 求解失败（传输、状态码、响应格式）: 回到编辑模式
    pub fn on_request_failed(&mut self) -> Transition {
        self.back_to_editing()
    }

    /// 名单变更: 持有的排班索引已失效
    pub fn on_roster_mutated(&mut self) -> Transition {
        self.back_to_editing()
    }

    /// 删除人员: 若被删者处于选中则取消选中
    pub fn on_staff_removed(&mut self, staff_id: StaffId) -> Transition {
        let deselect = if self.selected == Some(staff_id) {
            self.clear_selection()
        } else {
            Transition::default()
        };
        deselect.merge(self.on_roster_mutated())
    }

    /// 切换周期: 全部重置
    pub fn reset(&mut self) -> Transition {
        let before = std::mem::take(self);
        Transition {
            mode_changed: before.mode != AppMode::EditingConstraints,
            selection_changed: before.selected.is_some(),
            assignment_discarded: before.assignment.is_some(),
        }
    }

    fn back_to_editing(&mut self) -> Transition {
        let mode_changed = self.mode != AppMode::EditingConstraints;
        self.mode = AppMode::EditingConstraints;
        Transition {
            mode_changed,
            assignment_discarded: self.assignment.take().is_some(),
            ..Transition::default()
        }
    }
}
