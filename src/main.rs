//! Fleet Console - Command Line Driver
//!
//! Boots the workspace against the bundled mock data, signs in, and walks one
//! navigation so the guard, navigation filter, and page feeds can be inspected
//! from a terminal.
//!
//! Usage: `fleet-console [persona] [path]`, e.g. `fleet-console engineer /eng/devices`

use anyhow::Context as _;
use fleet_console::app::Workspace;
use fleet_console::auth::{Credentials, Persona};
use fleet_console::constants::LOG_FILE_PREFIX;
use fleet_console::features::business::company_rows;
use fleet_console::helpers::{get_or_create_data_dir, is_development};
use fleet_console::services::MockDataSource;
use fleet_console::states::FilePreferenceStore;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Console output plus a daily rolling file in the data directory
fn init_tracing() -> anyhow::Result<WorkerGuard> {
    let level = if is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let log_dir = get_or_create_data_dir().context("data directory unavailable")?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .init();
    Ok(guard)
}

fn main() -> anyhow::Result<()> {
    let _guard = init_tracing()?;

    let mut args = std::env::args().skip(1);
    let persona: Persona = match args.next() {
        Some(raw) => raw.parse().context("persona must be customerAdmin, internalOps or engineer")?,
        None => Persona::default(),
    };
    let path = args.next().unwrap_or_else(|| "/business/overview".to_string());

    tracing::info!("Starting Fleet Console...");

    let source = MockDataSource::embedded().context("bundled mock data is invalid")?;
    let preferences = FilePreferenceStore::in_config_dir().context("config directory unavailable")?;
    let mut workspace = Workspace::new(source, preferences);
    workspace.start();
    workspace.pump_until_idle(Duration::from_secs(5));

    if !workspace.session().is_authenticated() {
        workspace
            .login(&Credentials::new("demo@fleet.example", "demo"))
            .context("demo login rejected")?;
    }
    workspace.set_persona(persona);
    if let Some(company) = workspace.refs().companies().first().map(|c| c.id.clone()) {
        workspace.set_company(Some(company));
    }

    let route = workspace.navigate(&path);
    let idle = workspace.pump_until_idle(Duration::from_secs(5));

    println!("persona   {}", workspace.session().persona());
    println!("requested {path}");
    println!("rendered  {route} ({})", route.title());
    for group in workspace.visible_nav() {
        let items: Vec<&str> = group.items.iter().map(|i| i.label).collect();
        println!("nav       {}: {}", group.label, items.join(", "));
    }
    for row in company_rows(workspace.refs()) {
        println!(
            "company   {} ({} locations, {} devices)",
            row.name, row.locations, row.devices
        );
    }
    let overview = workspace.overview_view();
    for kpi in &overview.kpis {
        println!("kpi       {} [{}]: {}", kpi.label, overview.range_label, kpi.value);
    }
    println!(
        "feeds     fleet={} alerts={} firmware={} idle={idle}",
        workspace.fleet().data().len(),
        workspace.alerts().data().len(),
        workspace.firmware().data().len()
    );

    tracing::info!("Fleet Console exited");
    Ok(())
}
