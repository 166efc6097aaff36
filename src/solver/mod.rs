// ==========================================
// 医生值班排班系统 - 求解器边界
// ==========================================
// 职责: 定义求解器 trait、线上格式、HTTP 实现、在途请求登记
// 说明: 求解算法本身是外部服务，这里只约定请求/响应契约
// ==========================================

pub mod dto;
pub mod error;
pub mod http_client;
pub mod in_flight;

use async_trait::async_trait;

pub use dto::{decode_response, SolveOutcome, SolveRequest, SolverStaff};
pub use error::{SolverError, SolverResult};
pub use http_client::HttpSolverClient;
pub use in_flight::InFlightRegistry;

/// 排班求解器
///
/// # 实现说明
/// - `HttpSolverClient` 调用远端求解服务
/// - 测试中可用固定结果的桩实现
#[async_trait]
pub trait ScheduleSolver: Send + Sync {
    /// 提交一次求解
    ///
    /// # 返回
    /// - Ok(Assigned): 排班天数与名单索引已通过形状检查
    /// - Ok(Infeasible): 约束无法同时满足
    /// - Err: 传输或格式失败
    async fn solve(&self, request: &SolveRequest) -> SolverResult<SolveOutcome>;
}
