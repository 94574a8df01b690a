// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::ServiceManagerSettings;
use crate::errors::ActionError;
use crate::status::{ServiceStatus, StatusResult};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::{Duration, timeout};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability to observe and drive host services.
///
/// `query` never fails: every invocation problem is folded into the returned
/// [`StatusResult`]. Implementations do not retry.
pub trait ServiceManager: Send + Sync {
    fn query(&self, service: &str) -> impl Future<Output = StatusResult> + Send;

    fn start(&self, service: &str) -> impl Future<Output = Result<(), ActionError>> + Send;

    fn stop(&self, service: &str) -> impl Future<Output = Result<(), ActionError>> + Send;
}

/// Drives services through a systemctl-compatible CLI.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: String,
    query_timeout: Duration,
    action_timeout: Duration,
}

impl Default for Systemctl {
    fn default() -> Self {
        Self::new("systemctl")
    }
}

impl Systemctl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    pub fn from_settings(settings: &ServiceManagerSettings) -> Self {
        Self::new(settings.command.clone())
            .with_query_timeout(settings.query_timeout())
            .with_action_timeout(settings.action_timeout())
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_action_timeout(mut self, action_timeout: Duration) -> Self {
        self.action_timeout = action_timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `<program> <verb> <service>` and collect its output. The child is
    /// killed if the deadline passes.
    async fn invoke(
        &self,
        verb: &str,
        service: &str,
        limit: Duration,
    ) -> Result<Output, ActionError> {
        let child = Command::new(&self.program)
            .arg(verb)
            .arg(service)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        match timeout(limit, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(ActionError::Timeout(limit)),
        }
    }

    async fn act(&self, verb: &str, service: &str) -> Result<(), ActionError> {
        let output = self.invoke(verb, service, self.action_timeout).await?;
        if output.status.success() {
            return Ok(());
        }
        Err(ActionError::NonZeroExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl ServiceManager for Systemctl {
    async fn query(&self, service: &str) -> StatusResult {
        match self.invoke("status", service, self.query_timeout).await {
            Ok(output) => {
                let code = output.status.code();
                StatusResult::new(
                    service,
                    ServiceStatus::from_exit_code(code),
                    String::from_utf8_lossy(&output.stdout),
                    code,
                )
            }
            Err(ActionError::Timeout(_)) => StatusResult::timed_out(service),
            Err(e) => StatusResult::errored(service, e.to_string()),
        }
    }

    async fn start(&self, service: &str) -> Result<(), ActionError> {
        self.act("start", service).await
    }

    async fn stop(&self, service: &str) -> Result<(), ActionError> {
        self.act("stop", service).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Write an executable shell script standing in for systemctl.
    fn fake_systemctl(dir: &Path, body: &str) -> String {
        let path = dir.join("systemctl");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_query_active() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "echo \"$2 is running\"\nexit 0");

        let result = Systemctl::new(bin).query("nginx").await;
        assert_eq!(result.service_name, "nginx");
        assert_eq!(result.status, ServiceStatus::Active);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.raw_output, "nginx is running\n");
    }

    #[tokio::test]
    async fn test_query_inactive() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "exit 3");

        let result = Systemctl::new(bin).query("cups").await;
        assert_eq!(result.status, ServiceStatus::Inactive);
        assert_eq!(result.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_query_other_code_is_failed() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "exit 4");

        let result = Systemctl::new(bin).query("missing").await;
        assert_eq!(result.status, ServiceStatus::Failed);
        assert_eq!(result.exit_code, Some(4));
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "exec sleep 30");

        let result = Systemctl::new(bin)
            .with_query_timeout(Duration::from_millis(200))
            .query("slow")
            .await;
        assert_eq!(result.status, ServiceStatus::Timeout);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.raw_output, "Service check timed out");
    }

    #[tokio::test]
    async fn test_query_missing_binary_is_error() {
        let result = Systemctl::new("/nonexistent/systemctl").query("nginx").await;
        assert_eq!(result.status, ServiceStatus::Error);
        assert_eq!(result.exit_code, None);
        assert!(result.raw_output.contains("failed to run service manager"));
    }

    #[tokio::test]
    async fn test_query_passes_verb_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "echo \"$1 $2\"");

        let result = Systemctl::new(bin).query("sshd").await;
        assert_eq!(result.raw_output, "status sshd\n");
    }

    #[tokio::test]
    async fn test_start_success() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "[ \"$1\" = start ] || exit 9");
        assert!(Systemctl::new(bin).start("nginx").await.is_ok());
    }

    #[tokio::test]
    async fn test_stop_failure_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "echo \"Failed to $1 $2: Access denied\" >&2\nexit 1");

        let err = Systemctl::new(bin).stop("nginx").await.unwrap_err();
        match err {
            ActionError::NonZeroExit { code, ref stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "Failed to stop nginx: Access denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_action_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_systemctl(dir.path(), "exec sleep 30");

        let err = Systemctl::new(bin)
            .with_action_timeout(Duration::from_millis(200))
            .start("hung")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_action_missing_binary() {
        let err = Systemctl::new("/nonexistent/systemctl")
            .start("nginx")
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Spawn(_)));
    }

    #[test]
    fn test_from_settings() {
        let settings = ServiceManagerSettings {
            command: "/bin/fakectl".into(),
            query_timeout: 2,
            action_timeout: 7,
        };
        let ctl = Systemctl::from_settings(&settings);
        assert_eq!(ctl.program(), "/bin/fakectl");
        assert_eq!(ctl.query_timeout, Duration::from_secs(2));
        assert_eq!(ctl.action_timeout, Duration::from_secs(7));
    }
}
