// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Host service monitor: inspects each configured service, compares it with
//! its expected status and starts or stops it when it has drifted.

pub mod config;
pub mod control;
pub mod errors;
pub mod inspector;
pub mod monitor;
pub mod recovery;
pub mod report;
pub mod status;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::{Config, ServiceSpec};
pub use control::{ServiceManager, Systemctl};
pub use monitor::{MonitorLoop, PassSummary, ServiceReport};
pub use recovery::{Outcome, RecoveryAction, RecoveryEngine, RecoveryOutcome};
pub use status::{ServiceStatus, StatusResult};
