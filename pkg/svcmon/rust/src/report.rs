// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::monitor::{PassSummary, ServiceReport};
use log::{Level, log};

/// Log lines describing one service: the status line, then for drifted
/// services the drift warning, the attempt line and the outcome line.
pub fn report_lines(report: &ServiceReport) -> Vec<(Level, String)> {
    let name = &report.status.service_name;
    let mut lines = vec![(
        Level::Info,
        format!(
            "Service name: {name}, Current status: {}, Expected status: {}",
            report.status.status, report.expected_status
        ),
    )];

    if report.status.status.is_observation_failure() {
        lines.push((
            Level::Debug,
            format!("[{name}] status output: {}", report.status.raw_output.trim()),
        ));
    }

    if !report.drifted() {
        return lines;
    }

    lines.push((
        Level::Warn,
        format!(
            "Service {name} is not in expected status {}",
            report.expected_status
        ),
    ));

    match &report.recovery {
        Some(outcome) => {
            lines.push((Level::Info, format!("Attempting to recover {name}...")));
            if outcome.outcome.is_ok() {
                lines.push((
                    Level::Info,
                    format!("Recovery successful: {}", outcome.message),
                ));
            } else {
                lines.push((
                    Level::Error,
                    format!("Recovery failed ({}): {}", outcome.outcome, outcome.message),
                ));
            }
        }
        None if name.is_empty() => lines.push((
            Level::Error,
            "service entry has no name, not recovering".to_string(),
        )),
        None => lines.push((Level::Info, format!("[{name}] dry run, not recovering"))),
    }

    lines
}

pub fn log_report(report: &ServiceReport) {
    for (level, line) in report_lines(report) {
        log!(level, "{line}");
    }
}

pub fn summary_line(summary: &PassSummary) -> String {
    format!(
        "Service monitoring completed: {} service(s), {} in expected state, {} drifted, \
         {} recovered, {} recovery failure(s), {} invalid target(s), {} observation failure(s)",
        summary.total,
        summary.in_expected_state,
        summary.drifted,
        summary.recovered,
        summary.recovery_failed,
        summary.invalid_target,
        summary.observation_failures,
    )
}

pub fn log_summary(summary: &PassSummary) {
    let level = if summary.is_healthy() {
        Level::Info
    } else {
        Level::Warn
    };
    log!(level, "{}", summary_line(summary));
}
