// ==========================================
// 医生值班排班系统 - 人员名单仓储
// ==========================================
// 职责: 按周期保存人员名单，提供增删改、日期轮转、沿用上月
// 存储: 进程内存（不落盘）
// 并发: 内部 Mutex 串行化写入；每个周期维护修订号，供求解结果过期判断
// ==========================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::config::RosterDefaults;
use crate::domain::staff::{StaffId, StaffRecord};
use crate::domain::types::{BoundKind, DayMark, PeriodKey};
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 单个周期的名单
#[derive(Debug, Default)]
struct PeriodRoster {
    staff: Vec<StaffRecord>,
    revision: u64,
}

impl PeriodRoster {
    fn position(&self, period: PeriodKey, staff_id: StaffId) -> RepositoryResult<usize> {
        self.staff
            .iter()
            .position(|s| s.staff_id() == staff_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: format!("StaffRecord@{}", period),
                id: staff_id.to_string(),
            })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

// ==========================================
// RosterRepository - 人员名单仓储
// ==========================================
pub struct RosterRepository {
    periods: Mutex<HashMap<PeriodKey, PeriodRoster>>,
    defaults: RosterDefaults,
}

impl RosterRepository {
    /// 使用内置默认值（min=4, max=8）创建仓储
    pub fn new() -> Self {
        Self::with_defaults(RosterDefaults::default())
    }

    /// 使用配置中的新增人员默认上下限创建仓储
    pub fn with_defaults(defaults: RosterDefaults) -> Self {
        Self {
            periods: Mutex::new(HashMap::new()),
            defaults,
        }
    }

    pub fn defaults(&self) -> &RosterDefaults {
        &self.defaults
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, HashMap<PeriodKey, PeriodRoster>>> {
        self.periods
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 获取周期名单（不存在则创建空名单并保存）
    pub fn get_period(&self, period: PeriodKey) -> RepositoryResult<Vec<StaffRecord>> {
        let mut periods = self.lock()?;
        Ok(periods.entry(period).or_default().staff.clone())
    }

    pub fn staff_count(&self, period: PeriodKey) -> RepositoryResult<usize> {
        let periods = self.lock()?;
        Ok(periods.get(&period).map(|r| r.staff.len()).unwrap_or(0))
    }

    /// 周期修订号（每次变更 +1）
    pub fn revision(&self, period: PeriodKey) -> RepositoryResult<u64> {
        let periods = self.lock()?;
        Ok(periods.get(&period).map(|r| r.revision).unwrap_or(0))
    }

    /// 按显示顺序取 StaffId
    pub fn staff_id_at(&self, period: PeriodKey, index: usize) -> RepositoryResult<StaffId> {
        let periods = self.lock()?;
        periods
            .get(&period)
            .and_then(|r| r.staff.get(index))
            .map(|s| s.staff_id())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: format!("StaffRecord@{}", period),
                id: format!("index={}", index),
            })
    }

    /// 按 StaffId 查找，返回 (显示索引, 记录)
    pub fn find_by_id(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
    ) -> RepositoryResult<Option<(usize, StaffRecord)>> {
        let periods = self.lock()?;
        Ok(periods.get(&period).and_then(|r| {
            r.staff
                .iter()
                .enumerate()
                .find(|(_, s)| s.staff_id() == staff_id)
                .map(|(i, s)| (i, s.clone()))
        }))
    }

    // ==========================================
    // 变更
    // ==========================================

    /// 追加人员（空日期集合，默认上下限，不偏好连班）
    ///
    /// # 返回
    /// - Err(ValidationError): 姓名 trim 后为空，名单不变
    pub fn add_staff(&self, period: PeriodKey, name: &str) -> RepositoryResult<StaffId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError("人员姓名不能为空".to_string()));
        }

        let record = StaffRecord::new(name, self.defaults.min, self.defaults.max);
        let staff_id = record.staff_id();

        let mut periods = self.lock()?;
        let roster = periods.entry(period).or_default();
        roster.staff.push(record);
        roster.touch();

        tracing::debug!(%period, %staff_id, name, "新增人员");
        Ok(staff_id)
    }

    /// 删除人员，后续人员索引依次前移
    pub fn remove_staff(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
    ) -> RepositoryResult<StaffRecord> {
        let mut periods = self.lock()?;
        let roster = periods.entry(period).or_default();
        let index = roster.position(period, staff_id)?;
        let removed = roster.staff.remove(index);
        roster.touch();

        tracing::debug!(%period, %staff_id, index, "删除人员");
        Ok(removed)
    }

    pub fn rename_staff(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
        name: &str,
    ) -> RepositoryResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError("人员姓名不能为空".to_string()));
        }
        self.update(period, staff_id, |s| s.set_name(name))
    }

    /// 设置班次上限或下限（写入时不检查 min ≤ max）
    pub fn set_bound(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
        kind: BoundKind,
        value: u32,
    ) -> RepositoryResult<()> {
        self.update(period, staff_id, |s| s.set_bound(kind, value))
    }

    pub fn set_prefer_double(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
        prefer_double: bool,
    ) -> RepositoryResult<()> {
        self.update(period, staff_id, |s| s.set_prefer_double(prefer_double))
    }

    /// 日期三态轮转
    ///
    /// # 返回
    /// - Ok(DayMark): 轮转后的标记
    /// - Err(FieldValueError): day 超出本周期天数
    pub fn toggle_day(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
        day: u32,
    ) -> RepositoryResult<DayMark> {
        if day >= period.days() {
            return Err(RepositoryError::FieldValueError {
                field: "day".to_string(),
                message: format!("day={} 超出 {} 的天数 {}", day, period, period.days()),
            });
        }
        self.update(period, staff_id, |s| s.toggle_day(day))
    }

    fn update<T>(
        &self,
        period: PeriodKey,
        staff_id: StaffId,
        f: impl FnOnce(&mut StaffRecord) -> T,
    ) -> RepositoryResult<T> {
        let mut periods = self.lock()?;
        let roster = periods.entry(period).or_default();
        let index = roster.position(period, staff_id)?;
        let out = f(&mut roster.staff[index]);
        roster.touch();
        Ok(out)
    }

    // ==========================================
    // 沿用上月 / 导入
    // ==========================================

    /// 目标周期为空且上一周期有名单时可沿用
    pub fn can_clone_forward(&self, period: PeriodKey) -> RepositoryResult<bool> {
        let periods = self.lock()?;
        let target_empty = periods.get(&period).map_or(true, |r| r.staff.is_empty());
        let source_present = periods
            .get(&period.previous())
            .is_some_and(|r| !r.staff.is_empty());
        Ok(target_empty && source_present)
    }

    /// 从上一周期沿用名单构成与上下限（日期约束不沿用）
    ///
    /// # 返回
    /// - Ok(usize): 沿用人数
    /// - Err(BusinessRuleViolation): 目标周期非空（不做任何修改）
    /// - Err(StaleCloneSource): 上一周期没有名单（不做任何修改）
    pub fn clone_forward(&self, period: PeriodKey) -> RepositoryResult<usize> {
        let mut periods = self.lock()?;

        if periods.get(&period).is_some_and(|r| !r.staff.is_empty()) {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "周期{}已有名单，不能沿用上月",
                period
            )));
        }

        let source = period.previous();
        let copies: Vec<StaffRecord> = match periods.get(&source) {
            Some(r) if !r.staff.is_empty() => {
                r.staff.iter().map(StaffRecord::carried_forward).collect()
            }
            _ => {
                return Err(RepositoryError::StaleCloneSource {
                    period: source.to_string(),
                })
            }
        };

        let count = copies.len();
        let roster = periods.entry(period).or_default();
        roster.staff = copies;
        roster.touch();

        tracing::info!(%period, %source, count, "沿用上月名单");
        Ok(count)
    }

    /// 将一份完整名单导入空周期
    ///
    /// # 返回
    /// - Err(BusinessRuleViolation): 目标周期非空
    /// - Err(ValidationError): 某人姓名为空，或某天同时为偏好与不可用
    /// - Err(FieldValueError): 某人的日期超出本周期天数
    pub fn import_period(
        &self,
        period: PeriodKey,
        records: Vec<StaffRecord>,
    ) -> RepositoryResult<usize> {
        for (index, record) in records.iter().enumerate() {
            record.check().map_err(|e| {
                RepositoryError::ValidationError(format!("第{}条人员记录无效: {}", index + 1, e))
            })?;
        }

        let days = period.days();
        if let Some(bad) = records
            .iter()
            .find(|r| r.max_marked_day().is_some_and(|d| d >= days))
        {
            return Err(RepositoryError::FieldValueError {
                field: "preferred/unavailable".to_string(),
                message: format!("人员{}的日期超出 {} 的天数 {}", bad.name(), period, days),
            });
        }

        let mut periods = self.lock()?;
        let roster = periods.entry(period).or_default();
        if !roster.staff.is_empty() {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "周期{}已有名单，不能导入",
                period
            )));
        }

        let count = records.len();
        roster.staff = records;
        roster.touch();

        tracing::info!(%period, count, "导入名单");
        Ok(count)
    }
}

impl Default for RosterRepository {
    fn default() -> Self {
        Self::new()
    }
}
