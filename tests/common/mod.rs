// Copyright (c) 2025-2026 the structpack contributors
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities and fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled `structpack` binary.
pub fn structpack_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_structpack"))
}

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Creates a mock project structure for testing.
pub fn create_mock_project(dir: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = dir.path().to_path_buf();

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    root
}

/// A small Go service.
pub fn go_project_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "go.mod",
            "module example.com/svc\n\ngo 1.22\n",
        ),
        (
            "main.go",
            r#"package main

import "fmt"

// main starts the service.
func main() {
	fmt.Println(greet("world"))
}

func greet(name string) string {
	return "hello " + name
}
"#,
        ),
    ]
}

/// Standard TypeScript project files for testing.
pub fn typescript_project_files() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "package.json",
            r#"{
  "name": "test-project",
  "version": "1.0.0",
  "main": "dist/index.js"
}
"#,
        ),
        (
            "src/index.ts",
            r#"import { format } from './format';

export interface User {
  id: number;
  name: string;
}

export function greet(user: User): string {
  return format(`Hello, ${user.name}!`);
}
"#,
        ),
    ]
}

/// A Python module with a docstring, a comment and an f-string.
pub fn python_project_files() -> Vec<(&'static str, &'static str)> {
    vec![(
        "app/service.py",
        r#"import os


class Service:
    """Talks to the backend."""

    def url(self, path: str) -> str:
        # build the url
        return f"""{os.environ["HOST"]}/{path}"""
"#,
    )]
}

/// Creates a temporary structpack.toml config file with specified content.
pub fn create_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("structpack.toml");
    std::fs::write(&config_path, content).expect("Failed to write config file");
    config_path
}

/// Runs the binary on `dir` with `args`, isolated from the caller's
/// `STRUCTPACK_*` environment and user config file.
pub fn run_cli(dir: &Path, args: &[&str]) -> Output {
    run_cli_with_env(dir, args, &[])
}

/// Like [`run_cli`], with extra environment variables set.
pub fn run_cli_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(structpack_bin());
    cmd.arg(dir);
    cmd.args(args);
    cmd.current_dir(dir);
    for (key, _) in std::env::vars() {
        if key.starts_with("STRUCTPACK") {
            cmd.env_remove(key);
        }
    }
    cmd.env_remove("RUST_LOG");
    cmd.env("XDG_CONFIG_HOME", dir.join(".no-user-config"));
    cmd.envs(env.iter().copied());
    cmd.output().expect("Failed to execute command")
}
