// ==========================================
// 医生值班排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、合法性检查
// 来源: JSON 配置文件 (可选) → 环境变量 → 命令行 (由调用方覆写)
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 求解服务地址
    pub const ENV_SOLVER_URL: &str = "DUTY_ROSTER_SOLVER_URL";
    /// 求解请求超时（秒）
    pub const ENV_TIMEOUT_SECS: &str = "DUTY_ROSTER_TIMEOUT_SECS";
    /// 每月允许的未填班次上限
    pub const ENV_MAX_UNFILLED: &str = "DUTY_ROSTER_MAX_UNFILLED";

    /// 配置目录名（位于系统配置目录下）
    pub const APP_DIR: &str = "duty-roster";
    /// 配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: path={path}, error={message}")]
    Io { path: String, message: String },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// 配置结构
// ==========================================

/// 求解服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 求解服务地址（POST，查询参数 days=N）
    pub endpoint: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 每月允许的未填班次上限（随请求作为提示参数发送）
    pub max_unfilled: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/cgi-bin/solve-cgi.py".to_string(),
            timeout_secs: 30,
            max_unfilled: 7,
        }
    }
}

/// 新增人员默认上下限
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterDefaults {
    pub min: u32,
    pub max: u32,
}

impl Default for RosterDefaults {
    fn default() -> Self {
        Self { min: 4, max: 8 }
    }
}

/// 系统配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub solver: SolverConfig,
    pub roster: RosterDefaults,
}

impl SchedulerConfig {
    /// 从 JSON 字符串解析（缺失字段取默认值）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: SchedulerConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式指定的配置文件；None 时尝试默认路径，不存在则使用默认值
    ///
    /// # 说明
    /// 文件加载后再应用环境变量覆写
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(p) => Self::load_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => {
                    tracing::info!("使用默认配置文件: {}", p.display());
                    Self::load_file(&p)?
                }
                _ => Self::default(),
            },
        };
        base.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// 应用环境变量覆写
    ///
    /// # 参数
    /// - lookup: 变量读取函数（测试中可注入）
    pub fn apply_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(url) = lookup(config_keys::ENV_SOLVER_URL) {
            self.solver.endpoint = url;
        }
        if let Some(raw) = lookup(config_keys::ENV_TIMEOUT_SECS) {
            self.solver.timeout_secs = parse_number(config_keys::ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(config_keys::ENV_MAX_UNFILLED) {
            self.solver.max_unfilled = parse_number(config_keys::ENV_MAX_UNFILLED, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// 合法性检查
    pub fn validate(&self) -> ConfigResult<()> {
        if self.solver.endpoint.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "solver.endpoint".to_string(),
                message: "不能为空".to_string(),
            });
        }
        if self.solver.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "solver.timeout_secs".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.roster.min > self.roster.max {
            return Err(ConfigError::InvalidValue {
                key: "roster.min".to_string(),
                message: format!("min={} 大于 max={}", self.roster.min, self.roster.max),
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}' 不是有效数字: {}", raw, e),
    })
}

/// 默认配置文件路径（系统配置目录/duty-roster/config.json）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(config_keys::APP_DIR).join(config_keys::CONFIG_FILE_NAME))
}
