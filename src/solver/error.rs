// ==========================================
// 医生值班排班系统 - 求解器边界错误类型
// ==========================================
// 传输失败、状态码异常、响应格式错误均属于"边界失败"
// 无解（空数组）不是错误，见 SolveOutcome::Infeasible
// ==========================================

use thiserror::Error;

/// 求解器边界错误
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("求解服务地址无效: {0}")]
    InvalidEndpoint(String),

    #[error("求解服务不可达: {0}")]
    Transport(String),

    #[error("求解服务返回错误状态: status={status}, body={body}")]
    Status { status: u16, body: String },

    #[error("求解结果格式错误: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SolverError {
    fn from(err: reqwest::Error) -> Self {
        SolverError::Transport(err.to_string())
    }
}

/// Result 类型别名
pub type SolverResult<T> = Result<T, SolverError>;
