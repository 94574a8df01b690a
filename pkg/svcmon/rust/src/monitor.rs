// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::ServiceSpec;
use crate::control::ServiceManager;
use crate::inspector::StatusInspector;
use crate::recovery::{Outcome, RecoveryEngine, RecoveryOutcome};
use crate::status::StatusResult;

/// Result of one service in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub expected_status: String,
    pub status: StatusResult,
    /// Present only when the service had drifted and recovery was attempted.
    pub recovery: Option<RecoveryOutcome>,
}

impl ServiceReport {
    pub fn drifted(&self) -> bool {
        !self.status.status.matches(&self.expected_status)
    }
}

/// Counts over a finished pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub total: usize,
    pub in_expected_state: usize,
    pub drifted: usize,
    pub recovered: usize,
    pub recovery_failed: usize,
    pub invalid_target: usize,
    pub observation_failures: usize,
}

impl PassSummary {
    pub fn from_reports(reports: &[ServiceReport]) -> Self {
        let mut summary = PassSummary {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports {
            if report.status.status.is_observation_failure() {
                summary.observation_failures += 1;
            }
            if !report.drifted() {
                summary.in_expected_state += 1;
                continue;
            }
            summary.drifted += 1;
            match report.recovery.as_ref().map(|r| r.outcome) {
                Some(Outcome::Success) | Some(Outcome::AlreadySatisfied) => summary.recovered += 1,
                Some(Outcome::Failed) => summary.recovery_failed += 1,
                Some(Outcome::InvalidTarget) => summary.invalid_target += 1,
                None => {}
            }
        }
        summary
    }

    /// Every service ended the pass where it was supposed to be.
    pub fn is_healthy(&self) -> bool {
        self.in_expected_state + self.recovered == self.total
    }
}

/// One pass over the configured services, strictly in order.
pub struct MonitorLoop<M> {
    manager: M,
    recovery_enabled: bool,
}

impl<M: ServiceManager> MonitorLoop<M> {
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            recovery_enabled: true,
        }
    }

    /// With recovery disabled drift is reported but nothing is started or stopped.
    pub fn with_recovery(mut self, enabled: bool) -> Self {
        self.recovery_enabled = enabled;
        self
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub async fn run(&self, specs: &[ServiceSpec]) -> Vec<ServiceReport> {
        self.run_with(specs, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `observer` as soon as each service is done.
    pub async fn run_with<F>(&self, specs: &[ServiceSpec], mut observer: F) -> Vec<ServiceReport>
    where
        F: FnMut(&ServiceReport),
    {
        let inspector = StatusInspector::new(&self.manager);
        let engine = RecoveryEngine::new(&self.manager);
        let mut reports = Vec::with_capacity(specs.len());

        for spec in specs {
            let name = spec.name.trim();
            let status = inspector.inspect(name).await;

            // A nameless entry was never queried, so there is nothing to act on.
            let drifted = !status.status.matches(&spec.expected_status);
            let recovery = if self.recovery_enabled && drifted && !name.is_empty() {
                let outcome = engine
                    .recover(name, status.status, &spec.expected_status)
                    .await;
                Some(outcome)
            } else {
                None
            };

            let report = ServiceReport {
                expected_status: spec.expected_status.clone(),
                status,
                recovery,
            };
            observer(&report);
            reports.push(report);
        }

        reports
    }
}
