// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use dd_svcmon::config::{config_path, load_config};
use dd_svcmon::monitor::{MonitorLoop, PassSummary};
use dd_svcmon::report::{log_report, log_summary};
use dd_svcmon::Systemctl;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Check host services against their expected status and recover drift.
#[derive(Parser, Debug)]
#[command(name = "dd-svcmon", version)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit without touching any service
    #[arg(long)]
    check_config: bool,

    /// Report drift without starting or stopping anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let path = config_path(args.config);
    let config = load_config(&path)?;

    let mut log_config = config.metrics_logger.to_log_config();
    if let Ok(level) = std::env::var("DD_LOG_LEVEL") {
        log_config.level = dd_agent_log::parse_level(&level);
    }
    dd_agent_log::init(&log_config).context("failed to set up logger")?;
    info!(
        "dd-svcmon starting (version {}, config {})",
        env!("CARGO_PKG_VERSION"),
        path.display()
    );

    let problems = config.validate();
    for problem in &problems {
        error!("invalid configuration: {problem}");
    }
    if args.check_config {
        if problems.is_empty() {
            info!("configuration OK: {} service(s)", config.services.len());
            return Ok(ExitCode::SUCCESS);
        }
        return Ok(ExitCode::FAILURE);
    }

    info!("loaded {} service(s)", config.services.len());
    info!("Starting service monitoring");

    let manager = Systemctl::from_settings(&config.service_manager);
    info!("using service manager {}", manager.program());
    let monitor = MonitorLoop::new(manager).with_recovery(!args.dry_run);
    let reports = monitor.run_with(&config.services, log_report).await;

    log_summary(&PassSummary::from_reports(&reports));
    Ok(ExitCode::SUCCESS)
}
