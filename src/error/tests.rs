// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, GitError, PortError, PortResult, WorkflowError};

#[test]
fn test_config_error_display() {
    let err: PortError = ConfigError::InvalidValue {
        section: "backport".to_string(),
        key: "remote".to_string(),
        message: "must not be empty".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"config error: invalid value for 'remote' in section '[backport]': must not be empty"
    );
}

#[test]
fn test_workflow_error_display() {
    let err: PortError = WorkflowError::TargetIsBase {
        number: 42,
        branch: "main".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"cannot backport PR #42 into its own base branch 'main'"
    );
    assert!(err.as_workflow().is_some());
}

#[test]
fn test_git_diagnostic_accessor() {
    let err: PortError = GitError::CommandFailed {
        command: "git apply".to_string(),
        message: "error: corrupt patch at line 3".to_string(),
    }
    .into();
    assert_eq!(err.git_diagnostic(), Some("error: corrupt patch at line 3"));
    assert!(err.as_workflow().is_none());

    let other = super::other("boom");
    assert!(other.git_diagnostic().is_none());
}

#[test]
fn test_port_error_size() {
    // Box<str> variants are 16 bytes (fat pointer), plus discriminant
    let size = std::mem::size_of::<PortError>();
    assert!(size <= 24, "PortError is {size} bytes, expected <= 24");
}

#[test]
fn test_port_result_size() {
    let size = std::mem::size_of::<PortResult<()>>();
    assert!(size <= 24, "PortResult<()> is {size} bytes, expected <= 24");
}
