// ==========================================
// SchedulerConfig 集成测试
// ==========================================
// 测试目标: 配置文件加载、缺省值、错误文件、默认上下限生效
// ==========================================

use std::io::Write;
use tempfile::NamedTempFile;

use duty_roster::config::{ConfigError, RosterDefaults, SchedulerConfig};
use duty_roster::domain::types::PeriodKey;
use duty_roster::repository::RosterRepository;

fn write_config(raw: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(raw.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"{
            "solver": {"endpoint": "http://10.0.0.5:9000/solve", "timeout_secs": 8},
            "roster": {"min": 2, "max": 6}
        }"#,
    );

    let config = SchedulerConfig::load_file(file.path()).expect("Failed to load config");
    assert_eq!(config.solver.endpoint, "http://10.0.0.5:9000/solve");
    assert_eq!(config.solver.timeout_secs, 8);
    assert_eq!(config.solver.max_unfilled, 7);
    assert_eq!(config.roster, RosterDefaults { min: 2, max: 6 });
}

#[test]
fn test_malformed_config_file() {
    let file = write_config("{ not json");
    let result = SchedulerConfig::load_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = SchedulerConfig::load_file(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_zero_timeout_rejected() {
    let file = write_config(r#"{"solver": {"timeout_secs": 0}}"#);
    let result = SchedulerConfig::load_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_roster_defaults_apply_to_new_staff() {
    let file = write_config(r#"{"roster": {"min": 1, "max": 3}}"#);
    let config = SchedulerConfig::load_file(file.path()).unwrap();

    let repo = RosterRepository::with_defaults(config.roster);
    let p = PeriodKey::from_month(2024, 9).unwrap();
    let id = repo.add_staff(p, "Pham").unwrap();

    let (_, record) = repo.find_by_id(p, id).unwrap().unwrap();
    assert_eq!((record.min(), record.max()), (1, 3));
}
