//! Integration tests for hook ordering, failure handling, and chains.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use serde_json::json;

use renderhub_core::error::{AppError, ErrorKind};
use renderhub_hooks::common::{GeneratedWarningHook, TimestampHook, metadata_hook};
use renderhub_hooks::{HookChain, PostHook, PreHook, Priority};

use crate::helpers::{self, Log, entries, marker_pre, prefix_post};

#[test]
fn test_priority_order_ignores_registration_order() {
    let renderer = helpers::embedded(&[("page", "body")]);
    let log = Log::default();

    for priority in [10, -5, 3, 0] {
        renderer.register_pre_hook(marker_pre(&log, &priority.to_string()), priority);
    }

    renderer.render("page", &()).unwrap();
    assert_eq!(entries(&log), ["-5", "0", "3", "10"]);
}

#[test]
fn test_same_priority_runs_in_registration_order() {
    let renderer = helpers::embedded(&[("page", "body")]);
    let log = Log::default();

    for marker in ["A", "B", "C"] {
        renderer.register_pre_hook(marker_pre(&log, marker), 5);
    }

    renderer.render("page", &()).unwrap();
    assert_eq!(entries(&log), ["A", "B", "C"]);
}

#[test]
fn test_negative_priorities_run_first() {
    let renderer = helpers::embedded(&[("page", "body")]);
    let log = Log::default();

    for priority in [1, 0, -1, -100] {
        renderer.register_pre_hook(marker_pre(&log, &priority.to_string()), priority);
    }

    renderer.render("page", &()).unwrap();
    assert_eq!(entries(&log), ["-100", "-1", "0", "1"]);
}

#[test]
fn test_pre_hook_failure_stops_render() {
    let renderer = helpers::embedded(&[("page", "body")]);
    let log = Log::default();
    let post_calls = Arc::new(AtomicUsize::new(0));

    renderer.register_pre_hook(marker_pre(&log, "A"), 5);
    let failing = Arc::clone(&log);
    renderer.register_pre_hook(
        PreHook::new(move |_| {
            failing.lock().unwrap().push("B".into());
            Err(AppError::validation("x"))
        }),
        5,
    );
    renderer.register_pre_hook(marker_pre(&log, "C"), 5);
    let counted = Arc::clone(&post_calls);
    renderer.register_post_hook(
        PostHook::new(move |ctx| {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(ctx.output.clone())
        }),
        Priority::DEFAULT,
    );

    let err = renderer.render("page", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::PreHook);
    assert_eq!(err.message, "pre-hook failed: x");
    assert_eq!(entries(&log), ["A", "B"]);
    assert_eq!(post_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_post_hooks_thread_output() {
    let renderer = helpers::embedded(&[("page", "original")]);
    renderer.register_post_hook(prefix_post("hook1-"), Priority::DEFAULT);
    renderer.register_post_hook(prefix_post("hook2-"), Priority::DEFAULT);
    renderer.register_post_hook(prefix_post("hook3-"), Priority::DEFAULT);

    assert_eq!(
        renderer.render("page", &()).unwrap(),
        "hook3-hook2-hook1-original"
    );
}

#[test]
fn test_post_hook_failure_returns_error_only() {
    let renderer = helpers::embedded(&[("page", "original")]);
    renderer.register_post_hook(prefix_post("seen-"), Priority::DEFAULT);
    renderer.register_post_hook(
        PostHook::new(|_| Err(AppError::internal("post-processing failed: test error"))),
        1,
    );

    let err = renderer.render("page", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::PostHook);
    assert!(err.to_string().contains("post-hook failed"));
    assert!(err.to_string().contains("test error"));
}

#[test]
fn test_empty_registry_matches_engine_output() {
    let renderer = helpers::embedded(&[("page", "Hi {{ who }}")]);
    assert!(renderer.hooks().is_empty());
    assert!(renderer.hooks().pre_hooks().is_empty());
    assert!(renderer.hooks().post_hooks().is_empty());

    assert_eq!(renderer.render("page", &json!({"who": "there"})).unwrap(), "Hi there");
}

#[test]
fn test_chain_priority_relative_to_independent_hook() {
    for (chain_priority, expected_pre, expected_out) in [
        (-10, ["P1", "P2", "independent"], "[indep][Q2][Q1]body"),
        (10, ["independent", "P1", "P2"], "[Q2][Q1][indep]body"),
    ] {
        let renderer = helpers::embedded(&[("page", "body")]);
        let log = Log::default();

        let chain = HookChain::new()
            .with_pre_hooks([marker_pre(&log, "P1"), marker_pre(&log, "P2")])
            .with_post_hooks([prefix_post("[Q1]"), prefix_post("[Q2]")]);

        renderer.register_pre_hook(marker_pre(&log, "independent"), Priority::DEFAULT);
        renderer.register_post_hook(prefix_post("[indep]"), Priority::DEFAULT);
        renderer.register_chain(&chain, chain_priority);

        let out = renderer.render("page", &()).unwrap();
        assert_eq!(entries(&log), expected_pre);
        assert_eq!(out, expected_out);
    }
}

#[test]
fn test_concurrent_registration_loses_nothing() {
    let renderer = helpers::embedded(&[("page", "body")]);
    let calls = Arc::new(AtomicUsize::new(0));

    std::thread::scope(|s| {
        for t in 0..8 {
            let renderer = &renderer;
            let calls = Arc::clone(&calls);
            s.spawn(move || {
                for i in 0..25 {
                    let calls = Arc::clone(&calls);
                    renderer.register_pre_hook(
                        PreHook::new(move |_| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        }),
                        (t * 25 + i) % 7 - 3,
                    );
                }
            });
        }
    });

    assert_eq!(renderer.hooks().pre_hook_count(), 200);
    renderer.render("page", &()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 200);
}

#[test]
fn test_registration_during_render_applies_to_next_render() {
    let renderer = Arc::new(helpers::embedded(&[("page", "body")]));
    let weak: Weak<_> = Arc::downgrade(&renderer);

    renderer.register_pre_hook(
        PreHook::new(move |_| {
            if let Some(renderer) = weak.upgrade() {
                renderer.register_post_hook(prefix_post("late-"), Priority::DEFAULT);
            }
            Ok(())
        }),
        Priority::DEFAULT,
    );

    assert_eq!(renderer.render("page", &()).unwrap(), "body");
    assert_eq!(renderer.render("page", &()).unwrap(), "late-body");
}

#[test]
fn test_metadata_flows_from_pre_to_post_hooks() {
    let renderer = helpers::embedded(&[("page", "body")]);
    renderer.register_pre_hook(metadata_hook(), Priority::DEFAULT);
    renderer.register_post_hook(
        PostHook::new(|ctx| {
            let name = ctx.metadata_str("template_name").unwrap_or("?");
            let stamped = ctx.metadata("processed_at").is_some();
            Ok(format!("{}|{name}|{stamped}", ctx.output))
        }),
        Priority::DEFAULT,
    );

    assert_eq!(renderer.render("page", &()).unwrap(), "body|page|true");
}

#[test]
fn test_common_headers_on_go_template() {
    let renderer = helpers::embedded(&[("model.go", "package {{ pkg }}\n")]);
    let stamp = chrono_fixed();

    renderer.register_post_hook(TimestampHook::new().fixed_time(stamp).build(), 0);
    renderer.register_post_hook(GeneratedWarningHook::new().build(), 1);

    let out = renderer.render("model.go", &json!({"pkg": "models"})).unwrap();
    assert_eq!(
        out,
        "// Code generated by renderhub. DO NOT EDIT.\n\
         // Generated on 2024-01-02 03:04:05\n\
         package models\n"
    );

    let plain = helpers::embedded(&[("notes.md", "# Notes")]);
    plain.register_post_hook(GeneratedWarningHook::new().build(), 0);
    assert_eq!(plain.render("notes.md", &()).unwrap(), "# Notes");
}

fn chrono_fixed() -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05+00:00").unwrap()
}
