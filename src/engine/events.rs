// ==========================================
// 医生值班排班系统 - 会话事件发布
// ==========================================
// 职责: 定义快照订阅 trait，渲染端只订阅快照
// 说明: 会话层在每次命令后发布，订阅方不回写状态
// ==========================================

use serde::Serialize;
use std::sync::Arc;

use crate::domain::snapshot::CalendarSnapshot;
use crate::domain::types::PeriodKey;
use crate::engine::interaction::Transition;

// ==========================================
// 会话事件类型
// ==========================================

/// 会话事件触发类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionEventType {
    /// 名单或约束编辑
    RosterEdited,
    /// 选中人员变化
    SelectionChanged,
    /// 求解请求已提交
    RequestStarted,
    /// 排班已应用
    ScheduleApplied,
    /// 求解无解
    ScheduleInfeasible,
    /// 求解失败（传输/格式）
    ScheduleFailed,
    /// 切换周期
    PeriodChanged,
}

impl SessionEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            SessionEventType::RosterEdited => "RosterEdited",
            SessionEventType::SelectionChanged => "SelectionChanged",
            SessionEventType::RequestStarted => "RequestStarted",
            SessionEventType::ScheduleApplied => "ScheduleApplied",
            SessionEventType::ScheduleInfeasible => "ScheduleInfeasible",
            SessionEventType::ScheduleFailed => "ScheduleFailed",
            SessionEventType::PeriodChanged => "PeriodChanged",
        }
    }
}

/// 会话事件
#[derive(Debug, Clone, Serialize)]
pub struct SessionEvent {
    pub period: PeriodKey,
    pub event_type: SessionEventType,
    pub transition: Transition,
    pub snapshot: CalendarSnapshot,
}

// ==========================================
// 快照订阅 Trait
// ==========================================

/// 快照订阅者
pub trait SnapshotSubscriber: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// 空操作订阅者（测试或无界面场景）
#[derive(Debug, Clone, Default)]
pub struct NoOpSubscriber;

impl SnapshotSubscriber for NoOpSubscriber {
    fn on_event(&self, event: &SessionEvent) {
        tracing::trace!(
            "NoOpSubscriber: 跳过事件 - period={}, event_type={}",
            event.period,
            event.event_type.as_str()
        );
    }
}

/// 可选订阅者包装
pub struct OptionalSubscriber {
    inner: Option<Arc<dyn SnapshotSubscriber>>,
}

impl OptionalSubscriber {
    pub fn with_subscriber(subscriber: Arc<dyn SnapshotSubscriber>) -> Self {
        Self {
            inner: Some(subscriber),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 是否需要构建快照（无订阅者时可跳过构建）
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    pub fn publish(&self, event: &SessionEvent) {
        match &self.inner {
            Some(subscriber) => subscriber.on_event(event),
            None => tracing::trace!(
                "OptionalSubscriber: 未配置订阅者，跳过事件 - event_type={}",
                event.event_type.as_str()
            ),
        }
    }
}

impl Default for OptionalSubscriber {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AppMode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<SessionEventType>>,
    }

    impl SnapshotSubscriber for Recorder {
        fn on_event(&self, event: &SessionEvent) {
            self.seen.lock().unwrap().push(event.event_type);
        }
    }

    fn event(event_type: SessionEventType) -> SessionEvent {
        let period = PeriodKey::new(2024, 0).unwrap();
        SessionEvent {
            period,
            event_type,
            transition: Transition::default(),
            snapshot: CalendarSnapshot {
                period,
                mode: AppMode::EditingConstraints,
                leading_days: vec![],
                staff: vec![],
                days: vec![],
                busy: false,
                can_export: false,
                can_clone_forward: false,
                report: None,
            },
        }
    }

    #[test]
    fn test_optional_subscriber_forwards() {
        let recorder = Arc::new(Recorder::default());
        let subscriber = OptionalSubscriber::with_subscriber(recorder.clone());
        assert!(subscriber.is_configured());

        subscriber.publish(&event(SessionEventType::RosterEdited));
        subscriber.publish(&event(SessionEventType::PeriodChanged));

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![SessionEventType::RosterEdited, SessionEventType::PeriodChanged]
        );
    }

    #[test]
    fn test_none_subscriber_is_silent() {
        let subscriber = OptionalSubscriber::default();
        assert!(!subscriber.is_configured());
        subscriber.publish(&event(SessionEventType::ScheduleApplied));
        NoOpSubscriber.on_event(&event(SessionEventType::ScheduleApplied));
    }
}
