// ==========================================
// 医生值班排班系统 - 配置层
// ==========================================
// 职责: 求解服务地址、超时、新增人员默认上下限
// 存储: JSON 文件 + 环境变量覆写
// ==========================================

pub mod config_manager;

// 重导出核心配置
pub use config_manager::{
    config_keys, default_config_path, ConfigError, ConfigResult, RosterDefaults, SchedulerConfig,
    SolverConfig,
};
