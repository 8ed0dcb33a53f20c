mod config;
mod error;

use std::path::{Path, PathBuf};

use access::{Capability, Panel, PermissionTable, Resolver, Role};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use estimating::StripeJob;
use gate::{AccessContext, Decision, Gate};
use storage::{AuditEvent, AuditKind, AuditStore, SessionSummary};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "pavefleet.toml";

/// Exit status for a denied check, distinct from errors (1).
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "pavefleet")]
#[command(about = "Access control and estimating tools for paving operations", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./pavefleet.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the role/capability matrix
    Roles {
        /// Print the table as TOML instead, as a starting point for a custom table
        #[arg(long)]
        toml: bool,
    },
    /// Check whether a role holds a capability
    Check {
        /// Role claim from the identity provider
        #[arg(short, long)]
        role: String,
        /// Capability name (canManageFleet or can_manage_fleet)
        #[arg(short = 'C', long)]
        capability: String,
        /// Who is asking, recorded in the audit log
        #[arg(short, long, default_value = "cli")]
        subject: String,
    },
    /// Check whether a role is one of a set of roles
    Member {
        #[arg(short, long)]
        role: String,
        /// Allowed roles, comma separated
        #[arg(short, long, value_delimiter = ',')]
        allowed: Vec<String>,
        #[arg(short, long, default_value = "cli")]
        subject: String,
    },
    /// List the dashboard panels a role can open
    Panels {
        #[arg(short, long)]
        role: String,
    },
    /// Check whether a role may open a dashboard panel
    Open {
        #[arg(short, long)]
        role: String,
        /// Panel name (fleet, time_tracking, ...)
        #[arg(short, long)]
        panel: String,
        #[arg(short, long, default_value = "cli")]
        subject: String,
    },
    /// Inspect the audit log
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },
    /// Return on investment percentage
    Roi {
        #[arg(long)]
        gain: f64,
        #[arg(long)]
        cost: f64,
    },
    /// Gallons of traffic paint for a striping job
    Paint {
        /// Total stripe length in feet
        #[arg(long)]
        feet: f64,
        /// Stripe width in inches
        #[arg(long, default_value_t = estimating::DEFAULT_WIDTH_INCHES)]
        width: f64,
        /// Coverage in square feet per gallon
        #[arg(long, default_value_t = estimating::DEFAULT_COVERAGE_SQFT_PER_GALLON)]
        coverage: f64,
        #[arg(long, default_value_t = 1)]
        coats: u32,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// List audit sessions
    Sessions {
        /// Show only the last N sessions
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show events for a session
    Logs {
        /// Session ID (prefix match supported)
        #[arg(short, long)]
        session: String,
        /// Filter by event kind
        #[arg(short, long, value_enum)]
        kind: Option<KindFilter>,
    },
    /// Show the most recent denied checks
    Denials {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Audit event kinds accepted by `audit logs --kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
enum KindFilter {
    SessionStart,
    SessionEnd,
    CapabilityCheck,
    RoleSetCheck,
    PanelCheck,
}

impl KindFilter {
    /// Matches `AuditKind::name()`.
    fn as_str(self) -> &'static str {
        match self {
            KindFilter::SessionStart => "session_start",
            KindFilter::SessionEnd => "session_end",
            KindFilter::CapabilityCheck => "capability_check",
            KindFilter::RoleSetCheck => "role_set_check",
            KindFilter::PanelCheck => "panel_check",
        }
    }
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&cli, &config);

    match cli.command {
        Commands::Roles { toml } => cmd_roles(&config, toml),
        Commands::Check {
            role,
            capability,
            subject,
        } => cmd_check(&config, &subject, &role, &capability),
        Commands::Member {
            role,
            allowed,
            subject,
        } => cmd_member(&config, &subject, &role, &allowed),
        Commands::Panels { role } => cmd_panels(&config, &role),
        Commands::Open {
            role,
            panel,
            subject,
        } => cmd_open(&config, &subject, &role, &panel),
        Commands::Audit { command } => match command {
            AuditCommands::Sessions { limit } => cmd_audit_sessions(&config, limit),
            AuditCommands::Logs { session, kind } => {
                cmd_audit_logs(&config, &session, kind.map(KindFilter::as_str))
            }
            AuditCommands::Denials { limit } => cmd_audit_denials(&config, limit),
        },
        Commands::Roi { gain, cost } => {
            let roi = estimating::roi_percent(gain, cost)?;
            println!("ROI: {roi:.2}%");
            Ok(0)
        }
        Commands::Paint {
            feet,
            width,
            coverage,
            coats,
        } => {
            let job = StripeJob::new(feet)
                .width(width)
                .coverage(coverage)
                .coats(coats);
            let gallons = estimating::paint_gallons(job)?;
            println!("{gallons:.1} gal");
            Ok(0)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

/// Terminal filter: --debug > --verbose > RUST_LOG > config level.
fn init_tracing(cli: &Cli, config: &Config) {
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn cmd_roles(config: &Config, as_toml: bool) -> Result<i32> {
    let table = config.permission_table()?;
    if as_toml {
        print!("{}", table.to_toml()?);
    } else {
        print!("{}", format_matrix(&table));
    }
    Ok(0)
}

fn cmd_check(config: &Config, subject: &str, role: &str, capability: &str) -> Result<i32> {
    let capability: Capability = capability.parse()?;
    let ctx = AccessContext::from_claim(subject, role);
    let gate = open_gate(config)?;
    let decision = gate.check_capability(&ctx, capability)?;
    gate.end()?;
    Ok(report(&decision))
}

fn cmd_member(config: &Config, subject: &str, role: &str, allowed: &[String]) -> Result<i32> {
    let allowed = allowed
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<Role>())
        .collect::<access::Result<Vec<_>>>()?;
    let ctx = AccessContext::from_claim(subject, role);
    let gate = open_gate(config)?;
    let decision = gate.check_role_set(&ctx, &allowed)?;
    gate.end()?;
    Ok(report(&decision))
}

fn cmd_panels(config: &Config, role: &str) -> Result<i32> {
    let resolver = Resolver::new(config.permission_table()?);
    let ctx = AccessContext::from_claim("cli", role);
    for panel in resolver.visible_panels(ctx.role) {
        println!("{panel}");
    }
    Ok(0)
}

fn cmd_open(config: &Config, subject: &str, role: &str, panel: &str) -> Result<i32> {
    let panel: Panel = panel.parse()?;
    let ctx = AccessContext::from_claim(subject, role);
    let gate = open_gate(config)?;
    let decision = gate.check_panel(&ctx, panel)?;
    gate.end()?;
    Ok(report(&decision))
}

fn cmd_audit_sessions(config: &Config, limit: usize) -> Result<i32> {
    let store = open_store(config)?;
    let sessions = store.list_sessions()?;

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(0);
    }

    println!(
        "{:<36}  {:<20}  {:<8}  {:<8}  STATUS",
        "SESSION ID", "STARTED", "CHECKS", "DENIED"
    );
    println!("{}", "-".repeat(90));

    for summary in sessions.into_iter().take(limit) {
        let started = Local
            .from_utc_datetime(&summary.started_at.naive_utc())
            .format("%Y-%m-%d %H:%M");
        let status = if summary.ended_at.is_some() {
            "ended"
        } else {
            "open"
        };
        println!(
            "{:<36}  {:<20}  {:<8}  {:<8}  {status}",
            summary.id, started, summary.check_count, summary.denied_count
        );
    }

    Ok(0)
}

fn cmd_audit_logs(config: &Config, session_prefix: &str, kind_filter: Option<&str>) -> Result<i32> {
    let store = open_store(config)?;
    let sessions = store.list_sessions()?;
    let session_id = find_session(&sessions, session_prefix)?.id;

    let events = store.load_events(session_id, kind_filter)?;

    if events.is_empty() {
        println!("No events found for session {session_id}");
        return Ok(0);
    }

    println!("Session: {session_id}\n");

    for event in events {
        println!("{}", format_event(&event));
    }

    Ok(0)
}

fn cmd_audit_denials(config: &Config, limit: usize) -> Result<i32> {
    let store = open_store(config)?;
    let denials = store.recent_denials(limit)?;

    if denials.is_empty() {
        println!("No denied checks recorded.");
        return Ok(0);
    }

    for event in denials {
        println!("{}  {}", event.session_id, format_event(&event));
    }

    Ok(0)
}

fn open_gate(config: &Config) -> Result<Gate> {
    let resolver = Resolver::new(config.permission_table()?);

    if !config.audit.enabled {
        debug!("audit disabled");
        return Ok(Gate::new(resolver));
    }

    let path = config.audit_path().ok_or(Error::NoDataDir)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store = AuditStore::open(&path)?;
    let gate = Gate::audited(resolver, store)?;
    info!(session = %gate.id, path = %path.display(), "audit session opened");
    Ok(gate)
}

fn open_store(config: &Config) -> Result<AuditStore> {
    let path = config.audit_path().ok_or(Error::NoDataDir)?;

    if !path.exists() {
        return Err(Error::DatabaseNotFound { path });
    }

    Ok(AuditStore::open(&path)?)
}

fn report(decision: &Decision) -> i32 {
    match decision {
        Decision::Allow => {
            println!("allow");
            0
        }
        Decision::Deny { reason } => {
            println!("deny: {reason}");
            EXIT_DENIED
        }
    }
}

fn find_session<'a>(sessions: &'a [SessionSummary], prefix: &str) -> Result<&'a SessionSummary> {
    let matching: Vec<_> = sessions
        .iter()
        .filter(|s| s.id.to_string().starts_with(prefix))
        .collect();

    match matching.as_slice() {
        [] => Err(Error::SessionNotFound {
            prefix: prefix.to_string(),
        }),
        [only] => Ok(*only),
        _ => Err(Error::AmbiguousSession {
            prefix: prefix.to_string(),
            matches: matching.iter().map(|s| s.id.to_string()).collect(),
        }),
    }
}

fn format_matrix(table: &PermissionTable) -> String {
    let width = Capability::ALL
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or_default();

    let mut out = format!("{:<width$}", "CAPABILITY");
    for role in Role::ALL {
        out.push_str(&format!("  {:<10}", role.as_str().to_uppercase()));
    }
    out = out.trim_end().to_string();
    out.push('\n');

    for capability in Capability::ALL {
        let mut line = format!("{:<width$}", capability.name());
        for role in Role::ALL {
            let mark = if table.get(role).allows(capability) { "x" } else { "-" };
            line.push_str(&format!("  {mark:<10}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn format_event(event: &AuditEvent) -> String {
    let time = Local
        .from_utc_datetime(&event.timestamp.naive_utc())
        .format("%H:%M:%S");

    let verdict = |allowed: bool| if allowed { "ALLOW" } else { "DENY" };

    match &event.kind {
        AuditKind::SessionStart => format!("[{time}] === Session started ==="),
        AuditKind::SessionEnd => format!("[{time}] === Session ended ==="),
        AuditKind::CapabilityCheck {
            subject,
            role,
            capability,
            allowed,
        } => format!(
            "[{time}] {}: {subject} ({role}) {capability}",
            verdict(*allowed)
        ),
        AuditKind::RoleSetCheck {
            subject,
            role,
            allowed_roles,
            allowed,
        } => {
            let names: Vec<_> = allowed_roles.iter().map(Role::as_str).collect();
            format!(
                "[{time}] {}: {subject} ({role}) in [{}]",
                verdict(*allowed),
                names.join(", ")
            )
        }
        AuditKind::PanelCheck {
            subject,
            role,
            panel,
            allowed,
        } => format!(
            "[{time}] {}: {subject} ({role}) panel {panel}",
            verdict(*allowed)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storage::SessionId;

    fn summary(id: &str) -> SessionSummary {
        SessionSummary {
            id: id.parse().unwrap(),
            started_at: Utc::now(),
            ended_at: None,
            check_count: 0,
            denied_count: 0,
        }
    }

    #[test]
    fn test_find_session_by_prefix() {
        let sessions = vec![
            summary("1b4e28ba-2fa1-11d2-883f-0016d3cca427"),
            summary("1b4f0000-2fa1-11d2-883f-0016d3cca427"),
            summary("9f000000-2fa1-11d2-883f-0016d3cca427"),
        ];

        assert_eq!(
            find_session(&sessions, "9f").unwrap().id,
            sessions[2].id
        );
        assert!(matches!(
            find_session(&sessions, "1b4"),
            Err(Error::AmbiguousSession { ref matches, .. }) if matches.len() == 2
        ));
        assert!(matches!(
            find_session(&sessions, "ff"),
            Err(Error::SessionNotFound { .. })
        ));
    }

    #[test]
    fn test_matrix_marks_grants() {
        let matrix = format_matrix(&PermissionTable::builtin());
        let lines: Vec<_> = matrix.lines().collect();
        assert_eq!(lines.len(), Capability::ALL.len() + 1);
        assert!(lines[0].starts_with("CAPABILITY"));
        assert!(lines[0].ends_with("HR"));

        let settings = lines
            .iter()
            .find(|l| l.starts_with("canManageSettings"))
            .unwrap();
        let marks: Vec<_> = settings.split_whitespace().skip(1).collect();
        assert_eq!(marks, vec!["x", "-", "-", "-", "-", "-"]);
    }

    #[test]
    fn test_format_event() {
        let event = AuditEvent::new(
            SessionId::new(),
            AuditKind::RoleSetCheck {
                subject: "hal".into(),
                role: Role::Hr,
                allowed_roles: vec![Role::Admin, Role::Manager],
                allowed: false,
            },
        );
        let line = format_event(&event);
        assert!(line.ends_with("DENY: hal (hr) in [admin, manager]"));
    }

    #[test]
    fn test_kind_filter_matches_audit_kind_names() {
        let session = SessionId::new();
        let kinds = [
            (KindFilter::SessionStart, AuditKind::SessionStart),
            (KindFilter::SessionEnd, AuditKind::SessionEnd),
            (
                KindFilter::CapabilityCheck,
                AuditKind::CapabilityCheck {
                    subject: "ana".into(),
                    role: Role::Admin,
                    capability: Capability::CanManageFleet,
                    allowed: true,
                },
            ),
            (
                KindFilter::RoleSetCheck,
                AuditKind::RoleSetCheck {
                    subject: "ana".into(),
                    role: Role::Admin,
                    allowed_roles: vec![Role::Admin],
                    allowed: true,
                },
            ),
            (
                KindFilter::PanelCheck,
                AuditKind::PanelCheck {
                    subject: "ana".into(),
                    role: Role::Admin,
                    panel: Panel::Fleet,
                    allowed: true,
                },
            ),
        ];
        assert_eq!(kinds.len(), KindFilter::value_variants().len());
        for (filter, kind) in kinds {
            assert_eq!(filter.as_str(), AuditEvent::new(session, kind).kind.name());
        }
    }

    #[test]
    fn test_logs_kind_is_validated() {
        let cli = Cli::try_parse_from([
            "pavefleet", "audit", "logs", "--session", "ab", "--kind", "panel_check",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Audit {
                command: AuditCommands::Logs {
                    kind: Some(KindFilter::PanelCheck),
                    ..
                }
            }
        ));

        assert!(Cli::try_parse_from([
            "pavefleet", "audit", "logs", "--session", "ab", "--kind", "panel_chek",
        ])
        .is_err());
    }

    #[test]
    fn test_report_exit_codes() {
        assert_eq!(report(&Decision::Allow), 0);
        assert_eq!(
            report(&Decision::Deny {
                reason: "nope".into()
            }),
            EXIT_DENIED
        );
    }

    #[test]
    fn test_open_gate_records_to_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.db");
        let config = Config::parse(&format!(
            "[audit]\ndatabase = {:?}\n",
            path.display().to_string()
        ))
        .unwrap();

        let gate = open_gate(&config).unwrap();
        let id = gate.id;
        let ctx = AccessContext::new("dana", Role::Accountant);
        gate.check_capability(&ctx, Capability::CanManageFleet).unwrap();
        gate.end().unwrap();

        let store = open_store(&config).unwrap();
        let summary = store.session_summary(id).unwrap();
        assert_eq!(summary.denied_count, 1);
    }

    #[test]
    fn test_open_store_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let config = Config::parse(&format!(
            "[audit]\ndatabase = {:?}\n",
            path.display().to_string()
        ))
        .unwrap();

        assert!(matches!(
            open_store(&config),
            Err(Error::DatabaseNotFound { .. })
        ));
    }
}
