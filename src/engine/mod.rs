// ==========================================
// 医生值班排班系统 - 引擎层
// ==========================================
// 职责: 交互状态机、排班校验、快照构建、事件发布
// 红线: 引擎不持有名单，只接收切片
// ==========================================

pub mod events;
pub mod interaction;
pub mod snapshot;
pub mod validator;

// 重导出核心引擎
pub use events::{
    NoOpSubscriber, OptionalSubscriber, SessionEvent, SessionEventType, SnapshotSubscriber,
};
pub use interaction::{InteractionState, Transition};
pub use snapshot::{build_snapshot, SnapshotInput};
pub use validator::ScheduleValidator;
