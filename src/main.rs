// ==========================================
// 医生值班排班系统 - 命令行入口
// ==========================================
// 流程: 读取名单文件 → 导入周期 → 调用求解服务 → 输出日历与校验报告
// 名单文件格式与求解请求体相同: [{name, preferred, unavailable, min, max, prefer_double}]
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use duty_roster::api::{ApiError, SchedulingSession, SolveCompletion};
use duty_roster::config::SchedulerConfig;
use duty_roster::domain::calendar;
use duty_roster::domain::snapshot::CalendarSnapshot;
use duty_roster::domain::violation::ValidationReport;
use duty_roster::logging::{self, LogFormat};
use duty_roster::repository::RosterRepository;
use duty_roster::solver::{HttpSolverClient, SolverStaff};
use duty_roster::{PeriodKey, APP_NAME, VERSION};

const WEEKDAYS: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

/// 月度双岗值班排班
#[derive(Debug, Parser)]
#[command(name = "duty-roster", version, about = "月度双岗值班排班")]
struct Cli {
    /// 名单文件（JSON）
    #[arg(long, value_name = "FILE")]
    roster: PathBuf,

    /// 年份
    #[arg(long)]
    year: i32,

    /// 月份（1-12）
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,

    /// 以 JSON 输出快照（日志同时切换为 JSON）
    #[arg(long)]
    json: bool,

    /// 配置文件路径
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 覆写求解服务地址
    #[arg(long, value_name = "URL")]
    solver_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_with_format(if cli.json { LogFormat::Json } else { LogFormat::Text });

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<i32> {
    tracing::info!("{} v{}", APP_NAME, VERSION);

    let mut config = SchedulerConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    if let Some(url) = &cli.solver_url {
        config.solver.endpoint = url.clone();
    }

    let Some(period) = PeriodKey::from_month(cli.year, cli.month) else {
        bail!("无效的年月: {}-{}", cli.year, cli.month);
    };

    let raw = std::fs::read_to_string(&cli.roster)
        .with_context(|| format!("无法读取名单文件: {}", cli.roster.display()))?;
    let wire: Vec<SolverStaff> = serde_json::from_str(&raw)
        .with_context(|| format!("名单文件格式错误: {}", cli.roster.display()))?;
    let records = wire
        .into_iter()
        .map(SolverStaff::into_record)
        .collect::<Result<Vec<_>, _>>()
        .context("名单记录无效")?;

    let repo = Arc::new(RosterRepository::with_defaults(config.roster.clone()));
    repo.import_period(period, records)
        .map_err(ApiError::from)
        .context("导入名单失败")?;

    let solver = HttpSolverClient::new(&config.solver).context("创建求解客户端失败")?;
    let mut session = SchedulingSession::new(period, repo, Arc::new(solver));

    match session.request_schedule().await {
        Ok(SolveCompletion::Applied { report, .. }) => {
            let snapshot = session.snapshot()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_text(&snapshot, &report));
            }
            Ok(if report.is_clean() { 0 } else { 2 })
        }
        Ok(SolveCompletion::Discarded { reason }) => bail!("求解结果已失效: {:?}", reason),
        Err(e @ ApiError::Infeasible { .. }) => {
            eprintln!("{}", e.user_notice());
            Ok(3)
        }
        Err(e) => Err(anyhow::Error::new(e).context("排班失败")),
    }
}

fn render_text(snapshot: &CalendarSnapshot, report: &ValidationReport) -> String {
    let mut out = String::new();
    let offset = calendar::leading_weekday_offset(snapshot.period) as usize;

    out.push_str(&format!("{} 值班表（{} 天）\n", snapshot.period, snapshot.days.len()));
    for day in &snapshot.days {
        let slots: Vec<&str> = day
            .slots
            .iter()
            .map(|s| s.as_deref().unwrap_or("-"))
            .collect();
        out.push_str(&format!(
            "{:>2} 周{}  {}\n",
            day.day + 1,
            WEEKDAYS[(offset + day.day) % 7],
            slots.join(" / ")
        ));
    }

    out.push_str("\n人员统计\n");
    for tally in &report.tallies {
        let bounds = snapshot
            .staff
            .get(tally.staff_index)
            .map(|s| format!("[{}-{}]", s.min, s.max))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {} {} 值班 {} 天，偏好命中 {}，连班 {} 天\n",
            tally.name, bounds, tally.assigned, tally.preferred_hits, tally.double_days
        ));
    }

    if report.unfilled_slots > 0 {
        out.push_str(&format!("\n空岗: {}\n", report.unfilled_slots));
    }

    if report.violations.is_empty() {
        out.push_str("\n无硬约束违规\n");
    } else {
        out.push_str("\n硬约束违规\n");
        for violation in &report.violations {
            let name = report
                .tally_for(violation.staff_index())
                .map(|t| t.name.as_str())
                .unwrap_or("?");
            out.push_str(&format!("  {}: {}\n", name, violation));
        }
    }
    out
}
