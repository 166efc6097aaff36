// ==========================================
// 医生值班排班系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换仓储/求解器错误为用户可读的错误消息
// 说明: 校验违规是报告数据，不是错误
// ==========================================

use thiserror::Error;

use crate::domain::types::PeriodKey;
use crate::repository::error::RepositoryError;
use crate::solver::error::SolverError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无法沿用上月: {0}")]
    StaleCloneSource(String),

    // ==========================================
    // 求解边界错误
    // ==========================================
    #[error("求解服务调用失败: {0}")]
    BoundaryTransportFailure(String),

    #[error("约束无法同时满足: period={period}")]
    Infeasible { period: PeriodKey },

    #[error("该周期已有求解请求在途: period={period}")]
    RequestInFlight { period: PeriodKey },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 稳定错误码（前端按码分支）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::StaleCloneSource(_) => "STALE_CLONE_SOURCE",
            ApiError::BoundaryTransportFailure(_) => "BOUNDARY_TRANSPORT_FAILURE",
            ApiError::Infeasible { .. } => "INFEASIBLE",
            ApiError::RequestInFlight { .. } => "REQUEST_IN_FLIGHT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 面向用户的提示
    pub fn user_notice(&self) -> String {
        match self {
            ApiError::Infeasible { .. } => {
                "当前约束无法排出满足条件的班表，请放宽上下限或不可用日期后重试".to_string()
            }
            ApiError::BoundaryTransportFailure(_) => "求解服务暂不可用，请稍后重试".to_string(),
            ApiError::RequestInFlight { .. } => "正在求解，请等待当前请求完成".to_string(),
            other => other.to_string(),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::InternalError(format!("名单锁获取失败: {}", msg))
            }
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::StaleCloneSource { period } => {
                ApiError::StaleCloneSource(format!("上一周期{}没有名单", period))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

// ==========================================
// 从 SolverError 转换
// ==========================================
impl From<SolverError> for ApiError {
    fn from(err: SolverError) -> Self {
        ApiError::BoundaryTransportFailure(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "StaffRecord".to_string(),
            id: "abc".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("StaffRecord"));
                assert!(msg.contains("abc"));
            }
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = RepositoryError::StaleCloneSource {
            period: "2024-01".to_string(),
        }
        .into();
        assert_eq!(api_err.code(), "STALE_CLONE_SOURCE");

        let api_err: ApiError = RepositoryError::ValidationError("姓名不能为空".to_string()).into();
        assert_eq!(api_err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_solver_error_is_boundary_failure() {
        let api_err: ApiError = SolverError::Status {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert_eq!(api_err.code(), "BOUNDARY_TRANSPORT_FAILURE");
        assert!(api_err.to_string().contains("500"));
    }

    #[test]
    fn test_infeasible_notice() {
        let err = ApiError::Infeasible {
            period: PeriodKey::new(2024, 1).unwrap(),
        };
        assert_eq!(err.code(), "INFEASIBLE");
        assert!(err.to_string().contains("2024-02"));
        assert!(err.user_notice().contains("放宽"));
    }
}
