// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Stand-in for systemctl. Service states live in `state/<name>`; every
/// invocation is appended to `calls.log`; `deny/<name>` makes start/stop fail.
const FAKE_SYSTEMCTL: &str = r#"#!/bin/sh
dir=$(dirname "$0")
verb=$1
name=$2
echo "$verb $name" >> "$dir/calls.log"
state=$(cat "$dir/state/$name" 2>/dev/null || echo missing)
case "$verb" in
  status)
    case "$state" in
      active) echo "$name.service - active (running)"; exit 0 ;;
      inactive) echo "$name.service - inactive (dead)"; exit 3 ;;
      hang) exec sleep 30 ;;
      *) echo "Unit $name.service could not be found."; exit 4 ;;
    esac
    ;;
  start|stop)
    if [ -e "$dir/deny/$name" ]; then
      echo "Failed to $verb $name.service: Access denied" >&2
      exit 1
    fi
    if [ "$verb" = start ]; then
      echo active > "$dir/state/$name"
    else
      echo inactive > "$dir/state/$name"
    fi
    ;;
  *)
    exit 2
    ;;
esac
"#;

/// A temp directory holding a fake service manager, its state and a config file.
pub struct Host {
    dir: tempfile::TempDir,
}

impl Host {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        std::fs::create_dir_all(dir.path().join("state")).unwrap();
        std::fs::create_dir_all(dir.path().join("deny")).unwrap();
        let bin = dir.path().join("systemctl");
        std::fs::write(&bin, FAKE_SYSTEMCTL).unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn systemctl(&self) -> PathBuf {
        self.path().join("systemctl")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.path().join("logs")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.yaml")
    }

    pub fn set_state(&self, service: &str, state: &str) {
        std::fs::write(self.path().join("state").join(service), format!("{state}\n")).unwrap();
    }

    pub fn state(&self, service: &str) -> String {
        std::fs::read_to_string(self.path().join("state").join(service))
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    pub fn deny(&self, service: &str) {
        std::fs::write(self.path().join("deny").join(service), "").unwrap();
    }

    /// Every `<verb> <name>` the fake received, in order.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    /// Write a config for `services` using the fake service manager.
    pub fn write_config(&self, services: &[(&str, &str)], log_format: &str) {
        let mut yaml = format!(
            "metrics_logger:\n  log_dir: {}\n  level: DEBUG\n  log_format: {log_format}\n\
             service_manager:\n  command: {}\n  query_timeout: 1\n  action_timeout: 2\n\
             services:",
            self.log_dir().display(),
            self.systemctl().display(),
        );
        if services.is_empty() {
            yaml.push_str(" []");
        }
        yaml.push('\n');
        for (name, expected) in services {
            yaml.push_str(&format!("  - name: {name}\n    expected_status: {expected}\n"));
        }
        self.write_raw_config(&yaml);
    }

    pub fn write_raw_config(&self, yaml: &str) {
        std::fs::write(self.config_path(), yaml)
            .unwrap_or_else(|e| panic!("failed to write config: {e}"));
    }

    /// Run one pass of dd-svcmon against this host.
    pub fn run(&self, extra_args: &[&str]) -> Run {
        let bin = env!("CARGO_BIN_EXE_dd-svcmon");
        let output = Command::new(bin)
            .arg("--config")
            .arg(self.config_path())
            .args(extra_args)
            .env_remove("DD_LOG_LEVEL")
            .env_remove("DD_SVCMON_CONFIG")
            .output()
            .expect("failed to run dd-svcmon");
        Run::from(output)
    }

    /// Contents of every log file written under the log dir.
    pub fn log_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.log_dir()) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| std::fs::read_to_string(e.path()).unwrap())
            .collect()
    }
}

pub struct Run {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        eprintln!("[dd-svcmon] {stderr}");
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stderr,
        }
    }
}

impl Run {
    pub fn has_line(&self, pattern: &str) -> bool {
        self.stderr.lines().any(|l| l.contains(pattern))
    }

    pub fn count_lines(&self, pattern: &str) -> usize {
        self.stderr.lines().filter(|l| l.contains(pattern)).count()
    }

    /// Index of the first line containing `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.stderr.lines().position(|l| l.contains(pattern))
    }
}
