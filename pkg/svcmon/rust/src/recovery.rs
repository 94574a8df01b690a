// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::control::ServiceManager;
use crate::status::ServiceStatus;
use std::fmt;

/// Corrective action a service manager can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Start,
    Stop,
}

impl RecoveryAction {
    /// Action table: the action that drives a service into `target`, if any.
    /// Only `active` and `inactive` can be forced.
    pub fn for_target(target: &str) -> Option<Self> {
        match target.parse::<ServiceStatus>().ok()? {
            ServiceStatus::Active => Some(RecoveryAction::Start),
            ServiceStatus::Inactive => Some(RecoveryAction::Stop),
            _ => None,
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            RecoveryAction::Start => "started",
            RecoveryAction::Stop => "stopped",
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryAction::Start => write!(f, "start"),
            RecoveryAction::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The corrective action ran and exited cleanly.
    Success,
    /// Nothing to do, current status already matches.
    AlreadySatisfied,
    /// The expected status cannot be forced by start/stop.
    InvalidTarget,
    /// The corrective action ran and failed or timed out.
    Failed,
}

impl Outcome {
    pub fn is_ok(self) -> bool {
        matches!(self, Outcome::Success | Outcome::AlreadySatisfied)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::AlreadySatisfied => write!(f, "already_satisfied"),
            Outcome::InvalidTarget => write!(f, "invalid_target"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryOutcome {
    pub service_name: String,
    pub outcome: Outcome,
    pub message: String,
    /// Action that was invoked, `None` when no process was touched.
    pub action: Option<RecoveryAction>,
}

/// Decides and runs the corrective action for one drifted service.
pub struct RecoveryEngine<'a, M> {
    manager: &'a M,
}

impl<'a, M: ServiceManager> RecoveryEngine<'a, M> {
    pub fn new(manager: &'a M) -> Self {
        Self { manager }
    }

    /// Bring `service` from `current` to `expected`. Never fails: adapter
    /// errors come back as [`Outcome::Failed`].
    pub async fn recover(
        &self,
        service: &str,
        current: ServiceStatus,
        expected: &str,
    ) -> RecoveryOutcome {
        let expected = expected.trim().to_ascii_lowercase();

        if current.matches(&expected) {
            return RecoveryOutcome {
                service_name: service.to_string(),
                outcome: Outcome::AlreadySatisfied,
                message: format!("Service {service} is already in {expected} state"),
                action: None,
            };
        }

        let Some(action) = RecoveryAction::for_target(&expected) else {
            return RecoveryOutcome {
                service_name: service.to_string(),
                outcome: Outcome::InvalidTarget,
                message: format!("Invalid required status: {expected}"),
                action: None,
            };
        };

        let result = match action {
            RecoveryAction::Start => self.manager.start(service).await,
            RecoveryAction::Stop => self.manager.stop(service).await,
        };

        let (outcome, message) = match result {
            Ok(()) => (
                Outcome::Success,
                format!("Service {service} {} successfully", action.past_tense()),
            ),
            Err(e) => (
                Outcome::Failed,
                format!("Failed to recover service {service}. Error: {}", e.stderr()),
            ),
        };

        RecoveryOutcome {
            service_name: service.to_string(),
            outcome,
            message,
            action: Some(action),
        }
    }
}
