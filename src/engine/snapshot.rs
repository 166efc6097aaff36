// ==========================================
// 医生值班排班系统 - 快照构建
// ==========================================
// 输入: 周期名单 + 交互状态 + 校验报告
// 输出: CalendarSnapshot（渲染契约）
// 红线: 排班与名单形状不一致时按无排班输出，不渲染失效索引
// ==========================================

use crate::domain::calendar;
use crate::domain::schedule::{Assignment, SLOTS_PER_DAY};
use crate::domain::snapshot::{CalendarSnapshot, DayView, StaffView};
use crate::domain::staff::StaffRecord;
use crate::domain::types::{AppMode, DayMark, PeriodKey};
use crate::domain::violation::ValidationReport;
use crate::engine::interaction::InteractionState;

/// 构建快照所需的输入
pub struct SnapshotInput<'a> {
    pub period: PeriodKey,
    pub roster: &'a [StaffRecord],
    pub state: &'a InteractionState,
    pub report: Option<&'a ValidationReport>,
    pub busy: bool,
    pub can_clone_forward: bool,
}

/// 构建日历快照
pub fn build_snapshot(input: SnapshotInput<'_>) -> CalendarSnapshot {
    let SnapshotInput {
        period,
        roster,
        state,
        report,
        busy,
        can_clone_forward,
    } = input;
    let days = period.days() as usize;

    let assignment: Option<&Assignment> = state.assignment().filter(|a| {
        match a.check_against(roster.len(), days) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%period, "快照忽略失效排班: {}", e);
                false
            }
        }
    });

    let selected_index = state
        .selected()
        .and_then(|id| roster.iter().position(|s| s.staff_id() == id));
    let selected_record = selected_index.map(|i| &roster[i]);
    let selected_cells = selected_index
        .zip(assignment)
        .map(|(i, a)| a.slots_of(i))
        .unwrap_or_default();

    let staff = roster
        .iter()
        .enumerate()
        .map(|(index, record)| StaffView {
            staff_id: record.staff_id(),
            index,
            name: record.name().to_string(),
            min: record.min(),
            max: record.max(),
            prefer_double: record.prefer_double(),
            selected: selected_index == Some(index),
            assigned: assignment.map(|a| a.count_assigned(index)),
        })
        .collect();

    let day_views = (0..days)
        .map(|day| {
            let shifts = assignment.and_then(|a| a.days().get(day));

            let mut slots: [Option<String>; SLOTS_PER_DAY] = Default::default();
            let mut highlighted = [false; SLOTS_PER_DAY];
            if let Some(shifts) = shifts {
                for (slot, value) in shifts.iter().enumerate() {
                    if let Some(index) = *value {
                        slots[slot] = roster.get(index).map(|s| s.name().to_string());
                    }
                }
            }
            for (cell_day, slot) in &selected_cells {
                if *cell_day == day {
                    highlighted[*slot] = true;
                }
            }

            let mark = selected_record.map(|r| r.day_mark(day as u32));
            DayView {
                day,
                slots,
                preferred: mark == Some(DayMark::Preferred),
                unavailable: mark == Some(DayMark::Unavailable),
                highlighted,
            }
        })
        .collect();

    let viewing = state.mode() == AppMode::ViewingSchedule;

    CalendarSnapshot {
        period,
        mode: state.mode(),
        leading_days: calendar::leading_padding_days(period),
        staff,
        days: day_views,
        busy,
        can_export: viewing && assignment.is_some(),
        can_clone_forward,
        report: report.filter(|_| assignment.is_some()).cloned(),
    }
}
