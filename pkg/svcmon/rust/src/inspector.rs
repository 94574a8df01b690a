// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::control::ServiceManager;
use crate::status::StatusResult;

/// Reads the live status of a service. Every call re-queries the host.
pub struct StatusInspector<'a, M> {
    manager: &'a M,
}

impl<'a, M: ServiceManager> StatusInspector<'a, M> {
    pub fn new(manager: &'a M) -> Self {
        Self { manager }
    }

    pub async fn inspect(&self, service: &str) -> StatusResult {
        let name = service.trim();
        if name.is_empty() {
            return StatusResult::errored(name, "empty service name");
        }
        self.manager.query(name).await
    }
}
