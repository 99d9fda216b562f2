// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ArtifactGenerator, COMMIT_MESSAGE, ConflictContext};
use crate::git::outcome::ApplyCounts;
use crate::template::TemplateSet;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn context() -> ConflictContext {
    ConflictContext {
        branch: "portbot/backport/42/7.x".to_string(),
        target: "7.x".to_string(),
        remote: "origin".to_string(),
        original_number: 42,
        original_url: "https://github.com/o/r/pull/42".to_string(),
        counts: ApplyCounts {
            applied: 3,
            rejected: 2,
            missing: 1,
        },
        commit_message: "[7.x] Backport PR #42: Fix\n\nBackports PR #42\n".to_string(),
    }
}

#[tokio::test]
async fn test_generate_writes_four_files_in_order() {
    let temp = temp_dir();
    let templates = TemplateSet::builtin();
    let written = ArtifactGenerator::new(&templates)
        .generate(temp.path(), &context())
        .await
        .expect("generates");

    let names: Vec<_> = written
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            "backport.rej.md",
            "begin-backport.rej",
            "finish-backport.rej",
            "commit-message-backport.rej",
        ]
    );

    let message = std::fs::read_to_string(temp.path().join(COMMIT_MESSAGE)).expect("read");
    assert_eq!(message, context().commit_message);

    let instructions =
        std::fs::read_to_string(temp.path().join("backport.rej.md")).expect("read");
    assert!(instructions.contains("https://github.com/o/r/pull/42"));
    assert!(instructions.contains("| applied with rejects    | 2 |"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_generate_sets_executable_bits() {
    use std::os::unix::fs::PermissionsExt;

    let temp = temp_dir();
    let templates = TemplateSet::builtin();
    ArtifactGenerator::new(&templates)
        .generate(temp.path(), &context())
        .await
        .expect("generates");

    let mode = |name: &str| {
        std::fs::metadata(temp.path().join(name))
            .expect("metadata")
            .permissions()
            .mode()
            & 0o777
    };
    assert_eq!(mode("backport.rej.md"), 0o644);
    assert_eq!(mode("begin-backport.rej"), 0o755);
    assert_eq!(mode("finish-backport.rej"), 0o755);
    assert_eq!(mode(COMMIT_MESSAGE), 0o644);
}

#[tokio::test]
async fn test_render_failure_writes_nothing() {
    let temp = temp_dir();
    let templates =
        TemplateSet::builtin().with_template("finish-backport.rej", "{{ not_in_context }}");
    let result = ArtifactGenerator::new(&templates)
        .generate(temp.path(), &context())
        .await;

    assert!(result.is_err());
    let entries = std::fs::read_dir(temp.path()).expect("read dir").count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn test_write_failure_propagates() {
    let temp = temp_dir();
    let missing = temp.path().join("does-not-exist");
    let templates = TemplateSet::builtin();
    let err = ArtifactGenerator::new(&templates)
        .generate(&missing, &context())
        .await
        .expect_err("directory is missing");
    assert!(err.to_string().contains("failed to write"));
}
