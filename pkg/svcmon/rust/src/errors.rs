// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized service status: {0:?}")]
pub struct UnrecognizedStatus(pub String);

/// Failure of a start/stop invocation.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("exited with code {}: {stderr}", display_code(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("failed to run service manager: {0}")]
    Spawn(#[from] std::io::Error),
}

impl ActionError {
    /// Captured stderr, or the error text when nothing was captured.
    pub fn stderr(&self) -> String {
        match self {
            ActionError::NonZeroExit { stderr, .. } if !stderr.is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (signal)".to_string(), |c| c.to_string())
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("service #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("service {name}: duplicate entry")]
    DuplicateName { name: String },
    #[error("service {name}: invalid expected_status {value:?} (expected active or inactive)")]
    InvalidTarget { name: String, value: String },
    #[error("service_manager.{field} must be at least 1 second")]
    ZeroTimeout { field: &'static str },
}
