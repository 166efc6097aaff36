// ==========================================
// 医生值班排班系统 - 排班会话 API
// ==========================================
// 职责: 显式上下文 {周期, 名单仓储, 交互状态}，所有命令经此进入
// 每次命令后向订阅者推送日历快照
// ==========================================
// 求解流程:
// 1) begin_schedule_request: 占用周期，记录 (周期, 名单修订号, 请求ID)
// 2) 调用求解器（可在会话外执行）
// 3) complete_schedule_request: 释放占用；周期或名单已变化则丢弃结果
// ==========================================

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::snapshot::CalendarSnapshot;
use crate::domain::staff::{StaffId, StaffRecord};
use crate::domain::types::{BoundKind, DayMark, PeriodKey};
use crate::domain::violation::ValidationReport;
use crate::engine::events::{OptionalSubscriber, SessionEvent, SessionEventType, SnapshotSubscriber};
use crate::engine::interaction::{InteractionState, Transition};
use crate::engine::snapshot::{build_snapshot, SnapshotInput};
use crate::engine::validator::ScheduleValidator;
use crate::repository::roster_repo::RosterRepository;
use crate::solver::{InFlightRegistry, ScheduleSolver, SolveOutcome, SolveRequest, SolverResult};

// ==========================================
// 求解票据与结果
// ==========================================

/// 一次求解请求的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveTicket {
    request_id: Uuid,
    period: PeriodKey,
    roster_revision: u64,
}

impl SolveTicket {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn roster_revision(&self) -> u64 {
        self.roster_revision
    }
}

/// 已占用、待提交给求解器的请求
#[derive(Debug, Clone)]
pub struct PendingSolve {
    pub ticket: SolveTicket,
    pub request: SolveRequest,
}

/// 结果被丢弃的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StaleReason {
    /// 已切换到其他周期
    PeriodChanged,
    /// 请求期间名单被修改
    RosterChanged,
}

/// 求解完成后的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum SolveCompletion {
    /// 排班已应用，进入查看模式
    Applied {
        report: ValidationReport,
        transition: Transition,
    },
    /// 过期结果，状态未变
    Discarded { reason: StaleReason },
}

// ==========================================
// SchedulingSession - 排班会话
// ==========================================

/// 排班会话
///
/// 职责：
/// 1. 名单编辑（增删改、日期三态、沿用上月）
/// 2. 人员选择与日期点击
/// 3. 周期切换
/// 4. 求解请求（在途占用 + 过期丢弃）
/// 5. 快照输出与排班校验
pub struct SchedulingSession {
    period: PeriodKey,
    roster_repo: Arc<RosterRepository>,
    state: InteractionState,
    // 进入查看模式时的名单修订号
    viewing_revision: Option<u64>,
    solver: Arc<dyn ScheduleSolver>,
    in_flight: Arc<InFlightRegistry>,
    subscriber: OptionalSubscriber,
    validator: ScheduleValidator,
}

impl SchedulingSession {
    /// 创建会话（编辑模式，无选中，无排班）
    pub fn new(
        period: PeriodKey,
        roster_repo: Arc<RosterRepository>,
        solver: Arc<dyn ScheduleSolver>,
    ) -> Self {
        Self {
            period,
            roster_repo,
            state: InteractionState::new(),
            viewing_revision: None,
            solver,
            in_flight: Arc::new(InFlightRegistry::new()),
            subscriber: OptionalSubscriber::none(),
            validator: ScheduleValidator::new(),
        }
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn SnapshotSubscriber>) -> Self {
        self.subscriber = OptionalSubscriber::with_subscriber(subscriber);
        self
    }

    /// 与其他会话共享在途登记
    pub fn with_in_flight(mut self, in_flight: Arc<InFlightRegistry>) -> Self {
        self.in_flight = in_flight;
        self
    }

    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// 当前周期名单（显示顺序）
    pub fn roster(&self) -> ApiResult<Vec<StaffRecord>> {
        Ok(self.roster_repo.get_period(self.period)?)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy(self.period)
    }

    // ==========================================
    // 名单编辑
    // ==========================================

    pub fn add_staff(&mut self, name: &str) -> ApiResult<StaffId> {
        let staff_id = self.roster_repo.add_staff(self.period, name)?;
        tracing::info!(period = %self.period, %staff_id, "新增人员");
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(staff_id)
    }

    /// 删除人员（其后人员索引前移）
    pub fn remove_staff(&mut self, staff_id: StaffId) -> ApiResult<()> {
        let removed = self.roster_repo.remove_staff(self.period, staff_id)?;
        tracing::info!(period = %self.period, %staff_id, name = removed.name(), "删除人员");
        let transition = self.state.on_staff_removed(staff_id);
        self.after_roster_edit(transition);
        Ok(())
    }

    pub fn rename_staff(&mut self, staff_id: StaffId, name: &str) -> ApiResult<()> {
        self.roster_repo.rename_staff(self.period, staff_id, name)?;
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(())
    }

    /// 设置上下限（写入时不校验 min ≤ max）
    pub fn set_bound(&mut self, staff_id: StaffId, kind: BoundKind, value: u32) -> ApiResult<()> {
        self.roster_repo.set_bound(self.period, staff_id, kind, value)?;
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(())
    }

    pub fn set_prefer_double(&mut self, staff_id: StaffId, prefer_double: bool) -> ApiResult<()> {
        self.roster_repo
            .set_prefer_double(self.period, staff_id, prefer_double)?;
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(())
    }

    /// 沿用上月名单
    ///
    /// # 返回
    /// - Err(BusinessRuleViolation): 本周期已有名单
    /// - Err(StaleCloneSource): 上一周期没有名单
    pub fn clone_forward(&mut self) -> ApiResult<usize> {
        let count = self.roster_repo.clone_forward(self.period)?;
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(count)
    }

    pub fn can_clone_forward(&self) -> ApiResult<bool> {
        Ok(self.roster_repo.can_clone_forward(self.period)?)
    }

    fn after_roster_edit(&mut self, transition: Transition) {
        if transition.assignment_discarded {
            self.viewing_revision = None;
            tracing::info!(period = %self.period, "名单变更，已丢弃当前排班");
        }
        self.publish(SessionEventType::RosterEdited, transition);
    }

    // ==========================================
    // 选择与日期点击
    // ==========================================

    /// 选择人员（再次选择同一人即取消）
    pub fn select_staff(&mut self, staff_id: StaffId) -> ApiResult<Transition> {
        if self.roster_repo.find_by_id(self.period, staff_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "人员(id={})不在{}名单中",
                staff_id, self.period
            )));
        }
        let transition = self.state.select_staff(staff_id);
        self.publish(SessionEventType::SelectionChanged, transition);
        Ok(transition)
    }

    pub fn clear_selection(&mut self) -> Transition {
        let transition = self.state.clear_selection();
        if !transition.is_noop() {
            self.publish(SessionEventType::SelectionChanged, transition);
        }
        transition
    }

    /// 点击日期
    ///
    /// # 返回
    /// - Ok(Some(mark)): 选中人员在该日的新标记
    /// - Ok(None): 查看模式或未选中人员，忽略
    pub fn day_clicked(&mut self, day: u32) -> ApiResult<Option<DayMark>> {
        let Some(staff_id) = self.state.day_click_target() else {
            tracing::debug!(period = %self.period, day, mode = ?self.state.mode(), "忽略日期点击");
            return Ok(None);
        };
        let mark = self.roster_repo.toggle_day(self.period, staff_id, day)?;
        let transition = self.state.on_roster_mutated();
        self.after_roster_edit(transition);
        Ok(Some(mark))
    }

    // ==========================================
    // 周期切换
    // ==========================================

    pub fn previous_period(&mut self) -> Transition {
        self.set_period(self.period.previous())
    }

    pub fn next_period(&mut self) -> Transition {
        self.set_period(self.period.next())
    }

    /// 切换周期: 状态全部重置
    pub fn set_period(&mut self, period: PeriodKey) -> Transition {
        let from = self.period;
        self.period = period;
        self.viewing_revision = None;
        let transition = self.state.reset();
        tracing::info!(%from, to = %period, "切换周期");
        self.publish(SessionEventType::PeriodChanged, transition);
        transition
    }

    // ==========================================
    // 求解
    // ==========================================

    /// 发起求解: 占用周期、清空选中、生成请求
    ///
    /// # 返回
    /// - Err(RequestInFlight): 该周期已有在途请求
    pub fn begin_schedule_request(&mut self) -> ApiResult<PendingSolve> {
        let period = self.period;
        let request_id = Uuid::new_v4();
        if !self.in_flight.try_acquire(period, request_id) {
            return Err(ApiError::RequestInFlight { period });
        }

        let loaded = self
            .roster_repo
            .get_period(period)
            .and_then(|roster| Ok((roster, self.roster_repo.revision(period)?)));
        let (roster, roster_revision) = match loaded {
            Ok(v) => v,
            Err(e) => {
                self.in_flight.release(period, request_id);
                return Err(e.into());
            }
        };

        let transition = self.state.begin_request();
        tracing::info!(%period, %request_id, staff = roster.len(), "发起求解");
        self.publish(SessionEventType::RequestStarted, transition);

        Ok(PendingSolve {
            ticket: SolveTicket {
                request_id,
                period,
                roster_revision,
            },
            request: SolveRequest::from_roster(period, &roster),
        })
    }

    /// 应用求解结果（任何路径都会释放占用）
    ///
    /// # 返回
    /// - Ok(Applied): 进入查看模式
    /// - Ok(Discarded): 周期或名单已变化，状态不变
    /// - Err(Infeasible | BoundaryTransportFailure): 回到编辑模式，丢弃排班
    pub fn complete_schedule_request(
        &mut self,
        ticket: SolveTicket,
        result: SolverResult<SolveOutcome>,
    ) -> ApiResult<SolveCompletion> {
        self.in_flight.release(ticket.period, ticket.request_id);

        if ticket.period != self.period {
            tracing::warn!(
                request_id = %ticket.request_id,
                ticket_period = %ticket.period,
                active = %self.period,
                "周期已切换，丢弃求解结果"
            );
            return Ok(SolveCompletion::Discarded {
                reason: StaleReason::PeriodChanged,
            });
        }

        let revision = self.roster_repo.revision(self.period)?;
        if revision != ticket.roster_revision {
            tracing::warn!(
                request_id = %ticket.request_id,
                expected = ticket.roster_revision,
                actual = revision,
                "名单已修改，丢弃求解结果"
            );
            return Ok(SolveCompletion::Discarded {
                reason: StaleReason::RosterChanged,
            });
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(request_id = %ticket.request_id, "求解失败: {}", e);
                let transition = self.state.on_request_failed();
                self.viewing_revision = None;
                self.publish(SessionEventType::ScheduleFailed, transition);
                return Err(e.into());
            }
        };

        match outcome {
            SolveOutcome::Infeasible => {
                let transition = self.state.on_infeasible();
                self.viewing_revision = None;
                tracing::info!(period = %self.period, "求解无解");
                self.publish(SessionEventType::ScheduleInfeasible, transition);
                Err(ApiError::Infeasible {
                    period: self.period,
                })
            }
            SolveOutcome::Assigned(assignment) => {
                let roster = self.roster_repo.get_period(self.period)?;
                let days = self.period.days() as usize;
                if let Err(e) = assignment.check_against(roster.len(), days) {
                    let transition = self.state.on_request_failed();
                    self.viewing_revision = None;
                    self.publish(SessionEventType::ScheduleFailed, transition);
                    return Err(ApiError::BoundaryTransportFailure(format!(
                        "排班与名单不一致: {}",
                        e
                    )));
                }

                let report = self.validator.validate(&assignment, &roster);
                let transition = self.state.enter_viewing(assignment);
                self.viewing_revision = Some(revision);
                tracing::info!(
                    period = %self.period,
                    violations = report.violations.len(),
                    unfilled = report.unfilled_slots,
                    "排班已应用"
                );
                self.publish(SessionEventType::ScheduleApplied, transition);
                Ok(SolveCompletion::Applied { report, transition })
            }
        }
    }

    /// 发起求解并等待结果
    pub async fn request_schedule(&mut self) -> ApiResult<SolveCompletion> {
        let pending = self.begin_schedule_request()?;
        let solver = Arc::clone(&self.solver);
        let result = solver.solve(&pending.request).await;
        self.complete_schedule_request(pending.ticket, result)
    }

    // ==========================================
    // 快照与校验
    // ==========================================

    /// 当前日历快照
    pub fn snapshot(&self) -> ApiResult<CalendarSnapshot> {
        let roster = self.roster_repo.get_period(self.period)?;
        let state = self.effective_state()?;
        let report = state
            .assignment()
            .map(|a| self.validator.validate(a, &roster));

        Ok(build_snapshot(SnapshotInput {
            period: self.period,
            roster: &roster,
            state: &state,
            report: report.as_ref(),
            busy: self.is_busy(),
            can_clone_forward: self.roster_repo.can_clone_forward(self.period)?,
        }))
    }

    /// 按当前名单重新校验持有的排班
    pub fn validation_report(&self) -> ApiResult<Option<ValidationReport>> {
        let state = self.effective_state()?;
        let Some(assignment) = state.assignment() else {
            return Ok(None);
        };
        let roster = self.roster_repo.get_period(self.period)?;
        if assignment
            .check_against(roster.len(), self.period.days() as usize)
            .is_err()
        {
            return Ok(None);
        }
        Ok(Some(self.validator.validate(assignment, &roster)))
    }

    // 名单可能被共享同一仓储的其他会话修改，修订号不一致时按无排班处理
    fn effective_state(&self) -> ApiResult<InteractionState> {
        let mut state = self.state.clone();
        if state.is_viewing() {
            let revision = self.roster_repo.revision(self.period)?;
            if self.viewing_revision != Some(revision) {
                state.on_roster_mutated();
            }
        }
        Ok(state)
    }

    fn publish(&self, event_type: SessionEventType, transition: Transition) {
        if !self.subscriber.is_configured() {
            return;
        }
        match self.snapshot() {
            Ok(snapshot) => self.subscriber.publish(&SessionEvent {
                period: self.period,
                event_type,
                transition,
                snapshot,
            }),
            Err(e) => tracing::warn!(event_type = event_type.as_str(), "快照构建失败: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSolver(SolveOutcome);

    #[async_trait]
    impl ScheduleSolver for FixedSolver {
        async fn solve(&self, _request: &SolveRequest) -> SolverResult<SolveOutcome> {
            Ok(self.0.clone())
        }
    }

    fn session(outcome: SolveOutcome) -> SchedulingSession {
        SchedulingSession::new(
            PeriodKey::new(2023, 1).unwrap(),
            Arc::new(RosterRepository::new()),
            Arc::new(FixedSolver(outcome)),
        )
    }

    #[test]
    fn test_day_click_without_selection_is_ignored() {
        let mut s = session(SolveOutcome::Infeasible);
        s.add_staff("A").unwrap();
        let before = s.roster_repo.revision(s.period()).unwrap();

        assert_eq!(s.day_clicked(3).unwrap(), None);
        assert_eq!(s.roster_repo.revision(s.period()).unwrap(), before);
    }

    #[test]
    fn test_select_unknown_staff() {
        let mut s = session(SolveOutcome::Infeasible);
        let err = s.select_staff(StaffId::new()).unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_infeasible_keeps_editing() {
        let mut s = session(SolveOutcome::Infeasible);
        s.add_staff("A").unwrap();

        let err = s.request_schedule().await.unwrap_err();
        assert!(matches!(err, ApiError::Infeasible { .. }));
        assert!(!s.state().is_viewing());
        assert!(!s.is_busy());
    }
}
