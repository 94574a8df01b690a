// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::UnrecognizedStatus;
use std::fmt;
use std::str::FromStr;

/// Normalized status of a host service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    /// Service manager reports the unit running (exit code 0).
    Active,
    /// Service manager reports the unit stopped (exit code 3).
    Inactive,
    /// Any other exit code.
    Failed,
    /// The status query did not finish in time.
    Timeout,
    /// The status query could not be run at all.
    Error,
    /// Label outside the taxonomy.
    Unknown,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Active => "active",
            ServiceStatus::Inactive => "inactive",
            ServiceStatus::Failed => "failed",
            ServiceStatus::Timeout => "timeout",
            ServiceStatus::Error => "error",
            ServiceStatus::Unknown => "unknown",
        }
    }

    /// Map a `status` exit code to a status.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ServiceStatus::Active,
            Some(3) => ServiceStatus::Inactive,
            _ => ServiceStatus::Failed,
        }
    }

    /// The query itself failed, so the reading says nothing about the service.
    pub fn is_observation_failure(self) -> bool {
        matches!(self, ServiceStatus::Timeout | ServiceStatus::Error)
    }

    /// Case-insensitive comparison against a configured label.
    pub fn matches(self, label: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(label.trim())
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = UnrecognizedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ServiceStatus::Active),
            "inactive" => Ok(ServiceStatus::Inactive),
            "failed" => Ok(ServiceStatus::Failed),
            "timeout" => Ok(ServiceStatus::Timeout),
            "error" => Ok(ServiceStatus::Error),
            "unknown" => Ok(ServiceStatus::Unknown),
            _ => Err(UnrecognizedStatus(s.to_string())),
        }
    }
}

/// One inspection of one service. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub service_name: String,
    pub status: ServiceStatus,
    pub raw_output: String,
    pub exit_code: Option<i32>,
}

impl StatusResult {
    pub fn new(
        service_name: impl Into<String>,
        status: ServiceStatus,
        raw_output: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            status,
            raw_output: raw_output.into(),
            exit_code,
        }
    }

    pub fn timed_out(service_name: impl Into<String>) -> Self {
        Self::new(
            service_name,
            ServiceStatus::Timeout,
            "Service check timed out",
            None,
        )
    }

    pub fn errored(service_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(service_name, ServiceStatus::Error, reason, None)
    }
}
