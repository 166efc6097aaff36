// ==========================================
// 医生值班排班系统 - 求解请求占用登记
// ==========================================
// 每个周期同一时刻最多一个在途求解请求
// 释放时校验请求 ID，旧请求不能释放新请求的占用
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::types::PeriodKey;

/// 在途请求登记表（可由多个会话通过 Arc 共享）
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    inner: Mutex<HashMap<PeriodKey, Uuid>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试占用周期
    ///
    /// # 返回
    /// - true: 占用成功
    /// - false: 该周期已有在途请求
    pub fn try_acquire(&self, period: PeriodKey, request_id: Uuid) -> bool {
        // 登记表只有单步插入/删除，锁中毒后内容仍然有效
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(&period) {
            return false;
        }
        map.insert(period, request_id);
        true
    }

    /// 释放占用（仅当 request_id 与登记一致）
    pub fn release(&self, period: PeriodKey, request_id: Uuid) -> bool {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map.get(&period) == Some(&request_id) {
            map.remove(&period);
            true
        } else {
            false
        }
    }

    pub fn is_busy(&self, period: PeriodKey) -> bool {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.contains_key(&period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request_per_period() {
        let registry = InFlightRegistry::new();
        let may = PeriodKey::new(2024, 4).unwrap();
        let june = may.next();
        let first = Uuid::new_v4();

        assert!(registry.try_acquire(may, first));
        assert!(!registry.try_acquire(may, Uuid::new_v4()));
        assert!(registry.try_acquire(june, Uuid::new_v4()));
        assert!(registry.is_busy(may));

        // 其它请求不能释放
        assert!(!registry.release(may, Uuid::new_v4()));
        assert!(registry.release(may, first));
        assert!(!registry.is_busy(may));
    }
}
