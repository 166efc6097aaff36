// ==========================================
// 医生值班排班系统 - HTTP 求解客户端
// ==========================================
// 协议: POST {endpoint}?days={n}，JSON 请求体为人员数组
// 策略: 单次请求，不重试；失败直接交给调用方
// ==========================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use std::time::Duration;
use tracing::instrument;

use crate::config::SolverConfig;
use crate::solver::dto::{decode_response, SolveOutcome, SolveRequest};
use crate::solver::error::{SolverError, SolverResult};
use crate::solver::ScheduleSolver;

/// 基于 reqwest 的求解客户端
#[derive(Debug, Clone)]
pub struct HttpSolverClient {
    client: reqwest::Client,
    endpoint: Url,
    max_unfilled: u32,
}

impl HttpSolverClient {
    /// 根据配置创建客户端
    pub fn new(config: &SolverConfig) -> SolverResult<Self> {
        let endpoint = Url::parse(config.endpoint.trim())
            .map_err(|e| SolverError::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SolverError::Transport(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            max_unfilled: config.max_unfilled,
        })
    }

    /// 带查询参数的请求地址
    pub fn request_url(&self, days: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("days", &days.to_string())
            .append_pair("max_unfilled", &self.max_unfilled.to_string());
        url
    }
}

#[async_trait]
impl ScheduleSolver for HttpSolverClient {
    #[instrument(
        skip(self, request),
        fields(period = %request.period, days = request.days, staff = request.staff.len())
    )]
    async fn solve(&self, request: &SolveRequest) -> SolverResult<SolveOutcome> {
        let url = self.request_url(request.days);
        tracing::debug!("提交求解请求: {}", url);

        let response = self.client.post(url).json(&request.staff).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolverError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let outcome = decode_response(&body, request.days, request.staff.len())?;
        match &outcome {
            SolveOutcome::Assigned(a) => tracing::info!(days = a.len(), "求解完成"),
            SolveOutcome::Infeasible => tracing::info!("求解服务返回无解"),
        }
        Ok(outcome)
    }
}
