//! Integration tests for template loading and rendering.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use renderhub_core::config::hooks::HooksConfig;
use renderhub_core::config::renderer::RendererConfig;
use renderhub_core::error::ErrorKind;
use renderhub_engine::Renderer;
use renderhub_hooks::common::hooks_from_config;
use renderhub_hooks::{PostHook, PreHook, Priority};

use crate::helpers::{self, TemplateDir};

#[derive(Serialize)]
struct Field {
    name: String,
    kind: String,
}

#[derive(Serialize)]
struct Model {
    package: String,
    name: String,
    fields: Vec<Field>,
}

fn user_model() -> Model {
    Model {
        package: "models".into(),
        name: "User".into(),
        fields: vec![
            Field {
                name: "ID".into(),
                kind: "int64".into(),
            },
            Field {
                name: "Email".into(),
                kind: "string".into(),
            },
        ],
    }
}

const MODEL_TEMPLATE: &str = "package {{ package }}\n\n\
type {{ name }} struct {\n\
{% for f in fields %}\t{{ f.name }} {{ f.kind }}\n{% endfor %}}\n";

#[test]
fn test_render_nested_file_template_with_struct_data() {
    let templates = TemplateDir::new();
    templates.write("models/model.go.tpl", MODEL_TEMPLATE);
    let renderer = templates.renderer();

    let out = renderer.render("models/model.go", &user_model()).unwrap();
    assert_eq!(
        out,
        "package models\n\ntype User struct {\n\tID int64\n\tEmail string\n}\n"
    );
}

#[test]
fn test_render_detects_inline_source() {
    let templates = TemplateDir::new();
    templates.write("greet.tpl", "file: {{ name }}");
    let renderer = templates.renderer();

    let data = json!({"name": "Ada"});
    assert_eq!(renderer.render("greet", &data).unwrap(), "file: Ada");
    assert_eq!(renderer.render("inline: {{ name }}", &data).unwrap(), "inline: Ada");
    assert_eq!(
        renderer
            .render("{% if name %}yes{% endif %}", &data)
            .unwrap(),
        "yes"
    );
}

#[test]
fn test_inline_render_sees_source_in_context() {
    let renderer = helpers::embedded(&[("unused", "")]);
    renderer.register_pre_hook(
        PreHook::new(|ctx| {
            assert!(ctx.template_name.is_empty());
            assert_eq!(ctx.template_source.as_deref(), Some("{{ n }}"));
            Ok(())
        }),
        Priority::DEFAULT,
    );
    assert_eq!(renderer.render_string("{{ n }}", &json!({"n": 1})).unwrap(), "1");
}

#[test]
fn test_missing_template_reports_path() {
    let templates = TemplateDir::new();
    let renderer = templates.renderer();

    let err = renderer.render_template("nowhere", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Template);
    assert!(err.message.contains("failed to load template"));
    assert!(err.message.contains("nowhere.tpl"));
}

#[test]
fn test_global_data_and_override() {
    let renderer = Renderer::builder()
        .template("banner", "{{ company }} {{ year }}")
        .global_data(&json!({"company": "Acme", "year": 2023}))
        .build()
        .unwrap();

    assert_eq!(renderer.render("banner", &()).unwrap(), "Acme 2023");
    assert_eq!(renderer.render("banner", &json!({"year": 2024})).unwrap(), "Acme 2024");

    renderer.global_context(&json!({"company": "Globex"})).unwrap();
    assert_eq!(renderer.render("banner", &()).unwrap(), "Globex 2023");
}

#[test]
fn test_reload_rereads_files() {
    let templates = TemplateDir::new();
    templates.write("version.tpl", "one");
    let renderer = templates.renderer();
    assert_eq!(renderer.render("version", &()).unwrap(), "one");

    templates.write("version.tpl", "two");
    assert_eq!(renderer.render("version", &()).unwrap(), "one");

    renderer.reload().unwrap();
    assert_eq!(renderer.render("version", &()).unwrap(), "two");
}

#[test]
fn test_engine_failure_skips_post_hooks() {
    let renderer = helpers::embedded(&[("page", "{{ undefined_value }}")]);
    renderer.register_post_hook(
        PostHook::new(|_| panic!("post-hook must not run after an engine failure")),
        Priority::DEFAULT,
    );

    let err = renderer.render("page", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Template);
    assert!(err.message.starts_with("template execution failed"));
    assert!(err.message.contains("undefined_value"));
}

#[test]
fn test_configured_hooks_end_to_end() {
    let templates = TemplateDir::new();
    templates.write("service.go.tpl", "package {{ package }}   \n\nfunc {{ name }}() {}\n");

    let config = RendererConfig {
        base_dir: Some(templates.path().to_string_lossy().into_owned()),
        ..RendererConfig::default()
    };
    let renderer = Renderer::builder().from_config(&config).build().unwrap();

    let mut hooks = HooksConfig {
        copyright: Some("Copyright 2024 Acme".into()),
        generated_warning: true,
        trim_trailing_whitespace: true,
        required_fields: vec!["name".into()],
        ..HooksConfig::default()
    };
    hooks.defaults.insert("package".into(), json!("service"));
    renderer.register_chain(&hooks_from_config(&hooks), Priority::DEFAULT);

    let out = renderer.render("service.go", &json!({"name": "Run"})).unwrap();
    assert_eq!(
        out,
        "// Code generated by renderhub. DO NOT EDIT.\n\
         // Copyright 2024 Acme\n\
         package service\n\nfunc Run() {}\n"
    );

    let err = renderer.render("service.go", &()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::PreHook);
    assert_eq!(err.message, "pre-hook failed: required field 'name' is missing");
}

#[test]
fn test_shared_renderer_across_threads() {
    let templates = TemplateDir::new();
    templates.write("item.tpl", "{{ id }}:{{ label | upper }}");
    let renderer = Arc::new(templates.renderer());
    renderer.register_post_hook(
        PostHook::new(|ctx| Ok(format!("<{}>", ctx.output))),
        Priority::DEFAULT,
    );

    let handles: Vec<_> = (0..8)
        .map(|id| {
            let renderer = Arc::clone(&renderer);
            std::thread::spawn(move || {
                (0..20)
                    .map(|_| {
                        renderer
                            .render("item", &json!({"id": id, "label": "x"}))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        for out in handle.join().unwrap() {
            assert_eq!(out, format!("<{id}:X>"));
        }
    }
    assert_eq!(renderer.compiled_count(), 1);
}
