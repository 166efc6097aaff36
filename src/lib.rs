// ==========================================
// 医生值班排班系统 - 核心库
// ==========================================
// 系统定位: 月度双岗值班排班（约束编辑 + 外部求解 + 结果校验）
// 技术栈: Rust + tokio + reqwest（求解服务为外部 HTTP 接口）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 名单存储
pub mod repository;

// 引擎层 - 状态机与校验
pub mod engine;

// 求解器边界 - 外部求解服务
pub mod solver;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 会话接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AppMode, BoundKind, DayMark, PeriodKey};

// 领域实体
pub use domain::{
    Assignment, CalendarSnapshot, DayView, StaffId, StaffRecord, StaffView, ValidationReport,
    Violation,
};

// 仓储
pub use repository::RosterRepository;

// 引擎
pub use engine::{InteractionState, ScheduleValidator, Transition};

// 求解器
pub use solver::{HttpSolverClient, ScheduleSolver, SolveOutcome, SolveRequest, SolverError};

// 配置
pub use config::SchedulerConfig;

// API
pub use api::{ApiError, ApiResult, SchedulingSession, SolveCompletion};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "医生值班排班系统";
