//! Status command implementation

use crate::cli::output::{format_services_json, status_icon, ServiceView};
use crate::cli::{
    apply_color_choice, build_dashboard, configured_services, discover_services, draw_dashboard,
    load_config_with_overrides, StatusArgs,
};
use crate::config::StatusWatchConfig;
use crate::logging::init_tracing;
use crate::poller::{StatusClient, StatusSource};
use crate::status::{Bucket, StatusReport};
use chrono::Local;

/// Summary line such as "✓ 2 online  ✗ 1 offline".
pub fn summary_line(report: &StatusReport) -> String {
    Bucket::ALL
        .iter()
        .filter_map(|bucket| {
            let count = report
                .values()
                .filter(|s| s.status.bucket() == *bucket)
                .count();
            (count > 0).then(|| {
                format!(
                    "{} {} {}",
                    status_icon(*bucket),
                    count,
                    bucket.label().to_lowercase()
                )
            })
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render one report for the terminal or as JSON.
pub fn render_report(
    config: &StatusWatchConfig,
    report: StatusReport,
    json: bool,
    color: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        let views: Vec<_> = report
            .iter()
            .map(|(key, snapshot)| ServiceView::new(key, snapshot))
            .collect();
        return Ok(format_services_json(&views, Local::now())?);
    }

    let mut services = configured_services(config)?;
    if services.is_empty() {
        services = discover_services(&report);
    }
    let summary = summary_line(&report);

    let mut dashboard = build_dashboard(services, config, color);
    dashboard.apply(Ok(report));
    let board = draw_dashboard(&dashboard);
    dashboard.into_renderer().into_parts();

    Ok(format!("{}\n{}", board, summary))
}

/// Handle `statuswatch status` command
pub async fn run_status(args: StatusArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.source)?;
    config.validate()?;
    init_tracing(&config.logging)?;
    apply_color_choice(&args.source);

    let client = StatusClient::new(config.client.clone())?;
    let report = client.fetch().await?;
    tracing::debug!(services = report.len(), "Fetched status report");

    render_report(&config, report, args.json, !args.source.no_color)
}
