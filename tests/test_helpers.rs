// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的名单初始化、桩求解器、快照记录器
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use duty_roster::api::SchedulingSession;
use duty_roster::domain::schedule::{Assignment, DayShifts};
use duty_roster::domain::staff::StaffId;
use duty_roster::domain::types::PeriodKey;
use duty_roster::engine::events::{SessionEvent, SessionEventType, SnapshotSubscriber};
use duty_roster::repository::RosterRepository;
use duty_roster::solver::{ScheduleSolver, SolveOutcome, SolveRequest, SolverError, SolverResult};

/// 构造周期（month 为 1-12）
pub fn period(year: i32, month: u32) -> PeriodKey {
    PeriodKey::from_month(year, month).expect("valid period")
}

/// 向周期追加人员，返回按顺序的 StaffId
pub fn seed_roster(repo: &RosterRepository, period: PeriodKey, names: &[&str]) -> Vec<StaffId> {
    names
        .iter()
        .map(|name| repo.add_staff(period, name).expect("add staff"))
        .collect()
}

/// 每天都由 f(day) 给出两岗的排班
pub fn assignment_from(days: u32, f: impl Fn(usize) -> DayShifts) -> Assignment {
    Assignment::new((0..days as usize).map(f).collect())
}

// ==========================================
// 桩求解器
// ==========================================

/// 预设结果
#[derive(Debug, Clone)]
pub enum Canned {
    Outcome(SolveOutcome),
    TransportFailure(String),
}

/// 返回预设结果并记录调用
pub struct StubSolver {
    canned: Mutex<Canned>,
    calls: AtomicUsize,
    last_request: Mutex<Option<SolveRequest>>,
}

impl StubSolver {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            canned: Mutex::new(canned),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn assigned(assignment: Assignment) -> Arc<Self> {
        Self::new(Canned::Outcome(SolveOutcome::Assigned(assignment)))
    }

    pub fn infeasible() -> Arc<Self> {
        Self::new(Canned::Outcome(SolveOutcome::Infeasible))
    }

    pub fn set(&self, canned: Canned) {
        *self.canned.lock().unwrap() = canned;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SolveRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScheduleSolver for StubSolver {
    async fn solve(&self, request: &SolveRequest) -> SolverResult<SolveOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.canned.lock().unwrap().clone() {
            Canned::Outcome(outcome) => Ok(outcome),
            Canned::TransportFailure(msg) => Err(SolverError::Transport(msg)),
        }
    }
}

// ==========================================
// 快照记录器
// ==========================================

#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSubscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn event_types(&self) -> Vec<SessionEventType> {
        self.events.lock().unwrap().iter().map(|e| e.event_type).collect()
    }

    pub fn last(&self) -> Option<SessionEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl SnapshotSubscriber for RecordingSubscriber {
    fn on_event(&self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// 创建会话（共享仓储返回给调用方）
pub fn new_session(
    period: PeriodKey,
    solver: Arc<StubSolver>,
) -> (Arc<RosterRepository>, SchedulingSession) {
    let repo = Arc::new(RosterRepository::new());
    let session = SchedulingSession::new(period, Arc::clone(&repo), solver);
    (repo, session)
}
