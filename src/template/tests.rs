// portbot: pull request backport bot
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{BEGIN_SCRIPT, FINISH_SCRIPT, INSTRUCTIONS, TemplateContext, TemplateSet};
use crate::error::{PortError, TemplateError};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn full_context() -> TemplateContext {
    TemplateContext::new()
        .with("number", 42)
        .with("url", "https://github.com/o/r/pull/42")
        .with("target", "7.x")
        .with("branch", "portbot/backport/42/7.x")
        .with("remote", "origin")
        .with("applied", 3)
        .with("rejected", 2)
        .with("missing", 0)
        .with("starting", "origin/7.x")
        .with("ending", "HEAD")
}

#[test]
fn test_render_replaces_placeholders() {
    let set = TemplateSet::builtin().with_template("greet", "Hi {{name}}, {{ name }}!{{  x_1 }}");
    let ctx = TemplateContext::new().with("name", "Ada").with("x_1", "?");
    let out = set.render("greet", &ctx).expect("renders");
    insta::assert_snapshot!(out, @"Hi Ada, Ada!?");
}

#[test]
fn test_builtin_templates_render() {
    let set = TemplateSet::builtin();
    let ctx = full_context();
    for name in [INSTRUCTIONS, BEGIN_SCRIPT, FINISH_SCRIPT] {
        let out = set.render(name, &ctx).expect("builtin renders");
        assert!(!out.contains("{{"), "{name} left a placeholder");
    }

    let finish = set.render(FINISH_SCRIPT, &ctx).expect("renders");
    assert!(finish.starts_with("#!/bin/sh"));
    assert!(finish.contains("git push --force origin portbot/backport/42/7.x"));

    let begin = set.render(BEGIN_SCRIPT, &ctx).expect("renders");
    assert!(begin.contains("git reset --quiet origin/7.x"));
}

#[test]
fn test_unknown_template() {
    let err = TemplateSet::builtin()
        .render("nope", &TemplateContext::new())
        .expect_err("unknown template");
    match err {
        PortError::Template(boxed) => match *boxed {
            TemplateError::NotFound(name) => assert_eq!(name, "nope"),
            other => panic!("Expected TemplateError::NotFound, got {other:?}"),
        },
        other => panic!("Expected PortError::Template, got {other:?}"),
    }
}

#[test]
fn test_unknown_placeholder() {
    let set = TemplateSet::builtin().with_template("t", "{{ known }} {{ unknown }}");
    let err = set
        .render("t", &TemplateContext::new().with("known", 1))
        .expect_err("missing value");
    insta::assert_snapshot!(err.to_string(), @"template error: template 't' uses unknown placeholder 'unknown'");
}

#[test]
fn test_load_override_dir() {
    let temp = temp_dir();
    std::fs::write(temp.path().join(INSTRUCTIONS), "Conflicts on {{ target }}").expect("write");

    let set = TemplateSet::load(Some(temp.path())).expect("loads");
    let out = set.render(INSTRUCTIONS, &full_context()).expect("renders");
    assert_eq!(out, "Conflicts on 7.x");

    // templates without an override keep the built-in text
    let begin = set.render(BEGIN_SCRIPT, &full_context()).expect("renders");
    assert!(begin.starts_with("#!/bin/sh"));
}

#[test]
fn test_load_without_dir_is_builtin() {
    let set = TemplateSet::load(None).expect("loads");
    assert!(set.render(INSTRUCTIONS, &full_context()).is_ok());
}
