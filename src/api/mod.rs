// ==========================================
// 医生值班排班系统 - API 层
// ==========================================
// 职责: 提供会话命令接口，供 CLI 或界面调用
// ==========================================

pub mod error;
pub mod session_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use session_api::{PendingSolve, SchedulingSession, SolveCompletion, SolveTicket, StaleReason};
