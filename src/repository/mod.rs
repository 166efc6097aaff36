// ==========================================
// 医生值班排班系统 - 数据仓储层
// ==========================================
// 职责: 人员名单的进程内存储
// 红线: 只做存取与字段级校验，不做排班校验
// ==========================================

pub mod error;
pub mod roster_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use roster_repo::RosterRepository;
