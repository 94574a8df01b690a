// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-memory [`ServiceManager`] for tests. Records every call and never
//! spawns a process.

use crate::control::ServiceManager;
use crate::errors::ActionError;
use crate::status::{ServiceStatus, StatusResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query(String),
    Start(String),
    Stop(String),
}

#[derive(Debug, Clone)]
enum Failure {
    Exit(String),
    Timeout(Duration),
}

impl Failure {
    fn to_error(&self) -> ActionError {
        match self {
            Failure::Exit(stderr) => ActionError::NonZeroExit {
                code: Some(1),
                stderr: stderr.clone(),
            },
            Failure::Timeout(limit) => ActionError::Timeout(*limit),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeServiceManager {
    statuses: Mutex<HashMap<String, ServiceStatus>>,
    start_failures: HashMap<String, Failure>,
    stop_failures: HashMap<String, Failure>,
    calls: Mutex<Vec<Call>>,
}

impl FakeServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status reported by `query` until a successful action changes it.
    pub fn with_status(self, service: &str, status: ServiceStatus) -> Self {
        self.lock_statuses().insert(service.to_string(), status);
        self
    }

    pub fn fail_start(mut self, service: &str, stderr: &str) -> Self {
        self.start_failures
            .insert(service.to_string(), Failure::Exit(stderr.to_string()));
        self
    }

    pub fn fail_stop(mut self, service: &str, stderr: &str) -> Self {
        self.stop_failures
            .insert(service.to_string(), Failure::Exit(stderr.to_string()));
        self
    }

    pub fn time_out_start(mut self, service: &str, limit: Duration) -> Self {
        self.start_failures
            .insert(service.to_string(), Failure::Timeout(limit));
        self
    }

    pub fn time_out_stop(mut self, service: &str, limit: Duration) -> Self {
        self.stop_failures
            .insert(service.to_string(), Failure::Timeout(limit));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Start/stop calls only.
    pub fn actions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Query(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn lock_statuses(&self) -> std::sync::MutexGuard<'_, HashMap<String, ServiceStatus>> {
        self.statuses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn act(
        &self,
        service: &str,
        failures: &HashMap<String, Failure>,
        reached: ServiceStatus,
    ) -> Result<(), ActionError> {
        if let Some(failure) = failures.get(service) {
            return Err(failure.to_error());
        }
        self.lock_statuses().insert(service.to_string(), reached);
        Ok(())
    }
}

impl ServiceManager for FakeServiceManager {
    async fn query(&self, service: &str) -> StatusResult {
        self.record(Call::Query(service.to_string()));
        let status = self.lock_statuses().get(service).copied();
        match status {
            Some(ServiceStatus::Timeout) => StatusResult::timed_out(service),
            Some(ServiceStatus::Error) => {
                StatusResult::errored(service, "failed to run service manager: permission denied")
            }
            Some(status) => {
                let code = match status {
                    ServiceStatus::Active => 0,
                    ServiceStatus::Inactive => 3,
                    _ => 1,
                };
                StatusResult::new(service, status, format!("{service}: {status}"), Some(code))
            }
            None => StatusResult::new(
                service,
                ServiceStatus::Failed,
                format!("Unit {service}.service could not be found."),
                Some(4),
            ),
        }
    }

    async fn start(&self, service: &str) -> Result<(), ActionError> {
        self.record(Call::Start(service.to_string()));
        self.act(service, &self.start_failures, ServiceStatus::Active)
    }

    async fn stop(&self, service: &str) -> Result<(), ActionError> {
        self.record(Call::Stop(service.to_string()));
        self.act(service, &self.stop_failures, ServiceStatus::Inactive)
    }
}
