// ==========================================
// 医生值班排班系统 - 求解器线上格式
// ==========================================
// 请求体: [{name, preferred, unavailable, min, max, prefer_double}]
// 响应体: [] (无解) 或 days 个 [index|null, index|null]
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::schedule::{Assignment, DayShifts};
use crate::domain::staff::{StaffRecord, StaffRecordError};
use crate::domain::types::PeriodKey;
use crate::solver::error::{SolverError, SolverResult};

/// 单个人员的线上格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStaff {
    pub name: String,
    #[serde(default)]
    pub preferred: Vec<u32>,
    #[serde(default)]
    pub unavailable: Vec<u32>,
    pub min: u32,
    pub max: u32,
    #[serde(default)]
    pub prefer_double: bool,
}

impl From<&StaffRecord> for SolverStaff {
    fn from(record: &StaffRecord) -> Self {
        Self {
            name: record.name().to_string(),
            preferred: record.preferred_days().iter().copied().collect(),
            unavailable: record.unavailable_days().iter().copied().collect(),
            min: record.min(),
            max: record.max(),
            prefer_double: record.prefer_double(),
        }
    }
}

impl SolverStaff {
    /// 转为领域记录（导入名单文件时使用）
    pub fn into_record(self) -> Result<StaffRecord, StaffRecordError> {
        StaffRecord::from_parts(
            &self.name,
            self.preferred,
            self.unavailable,
            self.min,
            self.max,
            self.prefer_double,
        )
    }
}

/// 一次求解请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub period: PeriodKey,
    pub days: u32,
    pub staff: Vec<SolverStaff>,
}

impl SolveRequest {
    /// 按名单顺序构造请求（顺序即响应中的索引编码）
    pub fn from_roster(period: PeriodKey, roster: &[StaffRecord]) -> Self {
        Self {
            period,
            days: period.days(),
            staff: roster.iter().map(SolverStaff::from).collect(),
        }
    }
}

/// 求解结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// 得到排班
    Assigned(Assignment),
    /// 约束无法同时满足
    Infeasible,
}

/// 解析响应体
///
/// # 返回
/// - Ok(Infeasible): 空数组
/// - Ok(Assigned): 天数与索引范围均合法
/// - Err(MalformedResponse): 非 JSON 数组、元素不是二元数组、天数或索引不匹配
pub fn decode_response(body: &str, days: u32, staff_count: usize) -> SolverResult<SolveOutcome> {
    let raw: Vec<DayShifts> = serde_json::from_str(body)
        .map_err(|e| SolverError::MalformedResponse(format!("无法解析响应: {}", e)))?;

    if raw.is_empty() {
        return Ok(SolveOutcome::Infeasible);
    }

    let assignment = Assignment::new(raw);
    assignment
        .check_against(staff_count, days as usize)
        .map_err(|e| SolverError::MalformedResponse(e.to_string()))?;
    Ok(SolveOutcome::Assigned(assignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_field_names() {
        let mut record = StaffRecord::new("Bowman", 0, 4);
        record.toggle_day(1);
        record.toggle_day(2);
        record.toggle_day(2);

        let json = serde_json::to_value(SolverStaff::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Bowman",
                "preferred": [1],
                "unavailable": [2],
                "min": 0,
                "max": 4,
                "prefer_double": false
            })
        );
    }

    #[test]
    fn test_staff_without_prefer_double_field() {
        let staff: SolverStaff =
            serde_json::from_str(r#"{"name":"Curtis","preferred":[3,4],"unavailable":[],"min":4,"max":6}"#)
                .unwrap();
        assert!(!staff.prefer_double);
        let record = staff.into_record().unwrap();
        assert_eq!(record.preferred_days().len(), 2);
    }

    #[test]
    fn test_decode_empty_is_infeasible() {
        assert_eq!(decode_response("[]", 30, 3).unwrap(), SolveOutcome::Infeasible);
    }

    #[test]
    fn test_decode_assignment() {
        let outcome = decode_response("[[0,null],[1,0],[null,null]]", 3, 2).unwrap();
        match outcome {
            SolveOutcome::Assigned(a) => {
                assert_eq!(a.len(), 3);
                assert_eq!(a.days()[1], [Some(1), Some(0)]);
            }
            other => panic!("Expected Assigned, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        // 天数不匹配
        assert!(matches!(
            decode_response("[[0,null]]", 2, 1),
            Err(SolverError::MalformedResponse(_))
        ));
        // 索引越界
        assert!(matches!(
            decode_response("[[5,null]]", 1, 2),
            Err(SolverError::MalformedResponse(_))
        ));
        // 负数索引
        assert!(matches!(
            decode_response("[[-1,null]]", 1, 2),
            Err(SolverError::MalformedResponse(_))
        ));
        // 非二元数组
        assert!(matches!(
            decode_response("[[0]]", 1, 2),
            Err(SolverError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_response("{\"error\":1}", 1, 2),
            Err(SolverError::MalformedResponse(_))
        ));
    }
}
