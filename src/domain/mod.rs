// ==========================================
// 医生值班排班系统 - 领域模型层
// ==========================================
// 职责: 定义周期、人员约束、排班结果、校验结果、快照
// 红线: 不含存储逻辑,不含引擎逻辑
// ==========================================

pub mod calendar;
pub mod schedule;
pub mod snapshot;
pub mod staff;
pub mod types;
pub mod violation;

// 重导出核心类型
pub use schedule::{Assignment, AssignmentMismatch, DayShifts, SLOTS_PER_DAY};
pub use snapshot::{CalendarSnapshot, DayView, StaffView};
pub use staff::{HardConstraints, SoftPreferences, StaffId, StaffRecord, StaffRecordError};
pub use types::{AppMode, BoundKind, DayMark, PeriodKey};
pub use violation::{StaffTally, ValidationReport, Violation};
