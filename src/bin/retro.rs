//! Retro CLI - Command-line front end for Retro Buddy
//!
//! Commands:
//! - view: Full dashboard view (snapshot JSON or text summary)
//! - velocity: Velocity series, optionally for one member
//! - costs: Meeting cost chart and single-meeting estimate
//! - insights: Insights for the latest sprint
//! - kudos: Kudos feed, with optional in-memory sends
//! - doctor: Diagnose configuration and data endpoints

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use retro_buddy::analytics::ENTIRE_TEAM_LABEL;
use retro_buddy::source::{CALENDAR_EVENTS_ENDPOINT, SPRINTS_ENDPOINT};
use retro_buddy::types::{ComparisonMember, CostFilterMode, KudosTag, Period};
use retro_buddy::{
    Dashboard, DashboardConfig, DashboardError, DashboardView, DataSource, FixtureSource,
    HttpSource, KudosFilters, KudosStore, KudosValidationError, SnapshotEncoder,
    PRODUCER_NAME, RETRO_VERSION,
};

/// Retro - sprint retrospective dashboard in the terminal
#[derive(Parser)]
#[command(name = "retro")]
#[command(version = RETRO_VERSION)]
#[command(about = "Velocity, meeting costs, insights and kudos for a sprint team", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (overrides config file and RETRO_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read sprints.json and calendar-events.json from a directory instead of the API
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Output format; defaults to text on a terminal and JSON otherwise
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full dashboard view
    View(ViewArgs),

    /// Print the velocity series
    Velocity {
        /// Member to chart instead of the whole team
        #[arg(long)]
        member: Option<String>,
    },

    /// Print the meeting cost chart and estimate
    Costs(CostArgs),

    /// Print insights for the latest sprint
    Insights,

    /// Print the kudos feed
    Kudos(KudosArgs),

    /// Diagnose configuration and data endpoints
    Doctor,
}

#[derive(Args)]
struct ViewArgs {
    /// Member to chart on the velocity series
    #[arg(long)]
    member: Option<String>,

    /// Sprint index for the work breakdown (defaults to the latest)
    #[arg(long)]
    breakdown: Option<usize>,

    /// Sprint indexes in the member comparison (defaults to all)
    #[arg(long, value_delimiter = ',')]
    compare_sprints: Option<Vec<usize>>,

    /// First comparison series; "Team" selects the whole team
    #[arg(long)]
    first: Option<String>,

    /// Second comparison series; "Team" selects the whole team
    #[arg(long)]
    second: Option<String>,

    #[command(flatten)]
    costs: CostArgs,

    #[command(flatten)]
    kudos: KudosArgs,
}

#[derive(Args)]
struct CostArgs {
    /// Bucketing period
    #[arg(long)]
    period: Option<PeriodArg>,

    /// Filter events by sprint or milestone
    #[arg(long)]
    filter_mode: Option<FilterModeArg>,

    /// Sprint label to keep in sprint mode
    #[arg(long)]
    sprint: Option<String>,

    /// Milestone label to keep in milestone mode
    #[arg(long)]
    milestone: Option<String>,

    /// Average hourly rate per participant
    #[arg(long)]
    hourly_rate: Option<f64>,

    /// Meeting length in hours
    #[arg(long)]
    meeting_hours: Option<f64>,
}

#[derive(Args)]
struct KudosArgs {
    /// Only show kudos for this recipient
    #[arg(long)]
    recipient: Option<String>,

    /// Only show kudos with this tag (e.g. "Pairing", "Above & Beyond")
    #[arg(long)]
    tag: Option<KudosTag>,

    /// Send a kudos to this member before printing the feed
    #[arg(long)]
    send_to: Option<String>,

    /// Tag of the kudos to send
    #[arg(long)]
    send_tag: Option<KudosTag>,

    /// Message of the kudos to send
    #[arg(long)]
    message: Option<String>,

    /// Hide the sender of the kudos to send
    #[arg(long)]
    anonymous: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    Day,
    Month,
    Year,
}

impl From<PeriodArg> for Period {
    fn from(p: PeriodArg) -> Self {
        match p {
            PeriodArg::Day => Period::Day,
            PeriodArg::Month => Period::Month,
            PeriodArg::Year => Period::Year,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterModeArg {
    Sprint,
    Milestone,
}

impl From<FilterModeArg> for CostFilterMode {
    fn from(m: FilterModeArg) -> Self {
        match m {
            FilterModeArg::Sprint => CostFilterMode::Sprint,
            FilterModeArg::Milestone => CostFilterMode::Milestone,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), RetroCliError> {
    let config = resolve_config(cli.config.as_deref(), cli.api_url)?;
    let source = build_source(cli.fixtures.as_deref(), &config)?;
    let format = cli.format.unwrap_or_else(default_format);
    debug!(source = %source.describe(), "resolved data source");

    if let Commands::Doctor = cli.command {
        return cmd_doctor(&config, source.as_ref(), format).await;
    }

    let location = source.describe();
    let mut dashboard = Dashboard::load(config, source.as_ref())
        .await
        .map_err(|e| RetroCliError::Load {
            message: e.user_message(&location),
            source: e,
        })?
        .with_kudos(KudosStore::with_sample_feed());

    match cli.command {
        Commands::View(args) => {
            apply_view_args(&mut dashboard, &args)?;
            let view = dashboard.view();
            match format {
                OutputFormat::Json => {
                    let encoder = SnapshotEncoder::new();
                    println!("{}", encoder.encode_to_json(&view, &location)?);
                }
                OutputFormat::Text => print_view(&view),
            }
        }

        Commands::Velocity { member } => {
            dashboard.selection_mut().set_velocity_member(member);
            let view = dashboard.view();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.velocity)?),
                OutputFormat::Text => print_velocity(&view),
            }
        }

        Commands::Costs(args) => {
            apply_cost_args(&mut dashboard, &args);
            let view = dashboard.view();
            match format {
                OutputFormat::Json => {
                    let out = serde_json::json!({
                        "costs": view.costs,
                        "meeting": view.meeting,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Text => print_costs(&view),
            }
        }

        Commands::Insights => {
            let view = dashboard.view();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.insights)?),
                OutputFormat::Text => print_insights(&view),
            }
        }

        Commands::Kudos(args) => {
            apply_kudos_args(&mut dashboard, &args)?;
            let view = dashboard.view();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view.kudos)?),
                OutputFormat::Text => print_kudos(&view),
            }
        }

        Commands::Doctor => {}
    }

    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
    api_url: Option<String>,
) -> Result<DashboardConfig, RetroCliError> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides();

    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    config.validate()?;
    Ok(config)
}

fn build_source(
    fixtures: Option<&Path>,
    config: &DashboardConfig,
) -> Result<Box<dyn DataSource>, DashboardError> {
    Ok(match fixtures {
        Some(dir) => Box::new(FixtureSource::from_dir(dir)),
        None => Box::new(HttpSource::from_config(config)?),
    })
}

fn default_format() -> OutputFormat {
    if atty::is(atty::Stream::Stdout) {
        OutputFormat::Text
    } else {
        OutputFormat::Json
    }
}

fn parse_comparison_member(value: &str) -> ComparisonMember {
    if value.eq_ignore_ascii_case("team") {
        ComparisonMember::Team
    } else {
        ComparisonMember::Named(value.to_string())
    }
}

fn apply_view_args(dashboard: &mut Dashboard, args: &ViewArgs) -> Result<(), RetroCliError> {
    let selection = dashboard.selection_mut();
    selection.set_velocity_member(args.member.clone());
    if let Some(index) = args.breakdown {
        selection.set_breakdown_sprint(Some(index));
    }
    if let Some(indexes) = &args.compare_sprints {
        selection.set_comparison_sprints(indexes.iter().copied());
    }
    if args.first.is_some() || args.second.is_some() {
        let (first, second) = selection.comparison_members();
        let first = args
            .first
            .as_deref()
            .map(parse_comparison_member)
            .unwrap_or_else(|| first.clone());
        let second = args
            .second
            .as_deref()
            .map(parse_comparison_member)
            .unwrap_or_else(|| second.clone());
        selection.set_comparison_members(first, second);
    }

    apply_cost_args(dashboard, &args.costs);
    apply_kudos_args(dashboard, &args.kudos)
}

fn apply_cost_args(dashboard: &mut Dashboard, args: &CostArgs) {
    let selection = dashboard.selection_mut();
    if let Some(period) = args.period {
        selection.set_period(period.into());
    }
    if let Some(mode) = args.filter_mode {
        selection.set_cost_filter_mode(mode.into());
    }
    if let Some(sprint) = &args.sprint {
        selection.set_sprint_filter(Some(sprint.clone()));
    }
    if let Some(milestone) = &args.milestone {
        selection.set_milestone_filter(Some(milestone.clone()));
    }
    if let Some(rate) = args.hourly_rate {
        selection.set_hourly_rate(rate);
    }
    if let Some(hours) = args.meeting_hours {
        selection.set_meeting_hours(hours);
    }
}

fn apply_kudos_args(dashboard: &mut Dashboard, args: &KudosArgs) -> Result<(), RetroCliError> {
    if args.send_to.is_some() || args.send_tag.is_some() || args.message.is_some() {
        dashboard.send_kudos(
            args.send_to.clone(),
            args.send_tag,
            args.message.clone().unwrap_or_default(),
            args.anonymous,
        )?;
    }

    dashboard.selection_mut().set_kudos_filters(KudosFilters {
        recipient: args.recipient.clone(),
        tag: args.tag,
    });
    Ok(())
}

async fn cmd_doctor(
    config: &DashboardConfig,
    source: &dyn DataSource,
    format: OutputFormat,
) -> Result<(), RetroCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} {}", PRODUCER_NAME, RETRO_VERSION),
    });

    checks.push(DoctorCheck {
        name: "config".to_string(),
        status: CheckStatus::Ok,
        message: format!(
            "API {} (timeout {}s), current user '{}'",
            config.api_base_url, config.request_timeout_secs, config.current_user
        ),
    });

    checks.push(DoctorCheck {
        name: "source".to_string(),
        status: CheckStatus::Ok,
        message: source.describe(),
    });

    checks.push(match source.fetch_sprints().await {
        Ok(sprints) if sprints.is_empty() => DoctorCheck {
            name: SPRINTS_ENDPOINT.to_string(),
            status: CheckStatus::Warning,
            message: "Reachable but returned no sprints".to_string(),
        },
        Ok(sprints) => DoctorCheck {
            name: SPRINTS_ENDPOINT.to_string(),
            status: CheckStatus::Ok,
            message: format!("{} sprints", sprints.len()),
        },
        Err(e) => DoctorCheck {
            name: SPRINTS_ENDPOINT.to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    checks.push(match source.fetch_calendar_events().await {
        Ok(events) => DoctorCheck {
            name: CALENDAR_EVENTS_ENDPOINT.to_string(),
            status: CheckStatus::Ok,
            message: format!("{} calendar events", events.len()),
        },
        Err(e) => DoctorCheck {
            name: CALENDAR_EVENTS_ENDPOINT.to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: RETRO_VERSION.to_string(),
        checks,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Retro Doctor Report");
            println!("===================");
            println!("Producer: {}", report.producer);
            println!("Version:  {}", report.version);
            println!("\nChecks:");

            for check in &report.checks {
                let status_icon = match check.status {
                    CheckStatus::Ok => "[OK]",
                    CheckStatus::Warning => "[WARN]",
                    CheckStatus::Error => "[ERR]",
                };
                println!("  {} {}: {}", status_icon, check.name, check.message);
            }
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(RetroCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Text rendering

fn print_view(view: &DashboardView) {
    print_velocity(view);

    println!();
    match &view.breakdown.sprint {
        Some(sprint) => println!("Work Breakdown ({sprint})"),
        None => println!("Work Breakdown"),
    }
    for slice in &view.breakdown.slices {
        println!("  {:<10} {:>6}", slice.name.as_str(), slice.value);
    }

    println!();
    println!("Member Comparison");
    for row in &view.comparison {
        let values: Vec<String> = row
            .values
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        println!("  {:<16} {}", row.sprint, values.join(", "));
    }

    println!();
    print_costs(view);
    println!();
    print_insights(view);
    println!();
    print_kudos(view);
}

fn print_velocity(view: &DashboardView) {
    let who = view
        .selection
        .velocity_member()
        .unwrap_or(ENTIRE_TEAM_LABEL);
    println!("Velocity ({who})");
    println!("  {:<16} {:>10} {:>10}", "Sprint", "Committed", "Completed");
    for point in &view.velocity {
        println!(
            "  {:<16} {:>10} {:>10}",
            point.sprint, point.committed, point.completed
        );
    }
}

fn print_costs(view: &DashboardView) {
    println!("{}", view.costs.title);
    if view.costs.buckets.is_empty() {
        println!("  (no matching events)");
    }
    for bucket in &view.costs.buckets {
        println!("  {:<12} {:>10.2}", bucket.period, bucket.cost);
    }

    if !view.calendar.is_empty() {
        println!();
        println!("Calendar");
        for entry in &view.calendar {
            println!("  {}  {}", entry.start.format("%Y-%m-%d %H:%M"), entry.label);
        }
    }

    let meeting = &view.meeting;
    println!();
    println!(
        "Meeting estimate: {} participants x {}h x {}/h = {:.2}",
        meeting.participants, meeting.meeting_hours, meeting.hourly_rate, meeting.cost
    );
    println!("  {}", meeting.message);
}

fn print_insights(view: &DashboardView) {
    match &view.insights.sprint {
        Some(sprint) => println!("Insights ({sprint})"),
        None => println!("Insights"),
    }
    if view.insights.items.is_empty() {
        println!("  (no sprint data)");
    }
    for item in &view.insights.items {
        println!("  - {}", item.message);
    }
}

fn print_kudos(view: &DashboardView) {
    println!("Kudos");
    if view.kudos.is_empty() {
        println!("  (no kudos yet)");
    }
    for card in &view.kudos {
        println!(
            "  [{}] {} -> {}  {}  ({})",
            card.avatar, card.sender_label, card.recipient, card.tag_label, card.sent_at
        );
        println!("      {}", card.message);
    }
}

// Error types

#[derive(Debug)]
enum RetroCliError {
    Load {
        source: DashboardError,
        message: String,
    },
    Dashboard(DashboardError),
    Json(serde_json::Error),
    Kudos(KudosValidationError),
    DoctorFailed,
}

impl From<DashboardError> for RetroCliError {
    fn from(e: DashboardError) -> Self {
        RetroCliError::Dashboard(e)
    }
}

impl From<serde_json::Error> for RetroCliError {
    fn from(e: serde_json::Error) -> Self {
        RetroCliError::Json(e)
    }
}

impl From<KudosValidationError> for RetroCliError {
    fn from(e: KudosValidationError) -> Self {
        RetroCliError::Kudos(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RetroCliError> for CliError {
    fn from(e: RetroCliError) -> Self {
        match e {
            RetroCliError::Load { source, message } => CliError {
                code: "LOAD_FAILED".to_string(),
                message,
                hint: Some(match source {
                    DashboardError::InvalidTimestamp { .. } => {
                        "Event start/end must be ISO-8601 timestamps".to_string()
                    }
                    _ => "Run 'retro doctor' to check the data endpoints".to_string(),
                }),
            },
            RetroCliError::Dashboard(e @ DashboardError::Config(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check --config, --api-url and RETRO_API_BASE_URL".to_string()),
            },
            RetroCliError::Dashboard(e @ DashboardError::Io { .. }) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RetroCliError::Dashboard(e) => CliError {
                code: "DASHBOARD_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            RetroCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            RetroCliError::Kudos(e) => CliError {
                code: "KUDOS_REJECTED".to_string(),
                message: e.to_string(),
                hint: Some("Pass --send-to, --send-tag and a non-empty --message".to_string()),
            },
            RetroCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
