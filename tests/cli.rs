mod common;

use std::io::Write;

use cosroutine::cli::commands::{
    IngredientOptions, ProductOptions, RoutineOptions, SiteOptions, run_ingredient_with,
    run_product_with, run_routine_with,
};

use common::*;

fn batch() -> SiteOptions {
    SiteOptions {
        delay_ms: Some(0),
        batch: true,
        ..SiteOptions::default()
    }
}

fn routine_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp file");
    file.write_all(yaml.as_bytes()).expect("write routine");
    file
}

// ── Routine command ─────────────────────────────────────────

#[test]
fn cli_routine_outputs_yaml_report() {
    let site = two_products();
    let file = routine_file("name: evening\nproducts:\n  - product a\n  - product b\n");
    let options = RoutineOptions {
        site: batch(),
        has: vec!["y".into()],
        ..RoutineOptions::default()
    };

    let yaml = run_routine_with(&site, file.path(), &options).expect("routine should succeed");

    assert!(yaml.contains("name: evening"));
    assert!(yaml.contains("- name: y\n  count: 2"));
    assert!(yaml.contains("ingredient: y"));

    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("valid yaml");
    let columns: Vec<&str> = value["presence"]["columns"]
        .as_sequence()
        .expect("presence columns")
        .iter()
        .filter_map(serde_yaml::Value::as_str)
        .collect();
    assert_eq!(columns, ["x", "y", "z"]);
}

#[test]
fn cli_routine_json_is_valid() {
    let site = two_products();
    let file = routine_file("products:\n  - product a\n  - product b\n");
    let options = RoutineOptions {
        site: batch(),
        format: "json".into(),
        top: 1,
        ..RoutineOptions::default()
    };

    let json = run_routine_with(&site, file.path(), &options).expect("routine should succeed");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["top"][0]["name"], "y");
    assert_eq!(value["top"][0]["count"], 2);
    assert_eq!(value["presence"]["rows"][1]["presence"], serde_json::json!([0, 1, 1]));
    assert_eq!(value["products"][0]["id"], "p_aaa");
}

#[test]
fn cli_routine_mask_limits_counts() {
    let site = two_products();
    let file = routine_file("products:\n  - product a\n  - product b\n");
    let options = RoutineOptions {
        site: batch(),
        mask: vec!["x".into(), "z".into()],
        format: "markdown".into(),
        ..RoutineOptions::default()
    };

    let md = run_routine_with(&site, file.path(), &options).expect("routine should succeed");

    assert!(md.contains("| 1 | x | 1 |"));
    assert!(md.contains("| 2 | z | 1 |"));
    assert!(!md.contains("| y | 2 |"));
}

#[test]
fn cli_routine_batch_skips_unknown_products() {
    let site = two_products().page(&product_search("ghost+cream"), &no_results_page());
    let site = site.page(&product_search("ghost"), &no_results_page());
    let file = routine_file("products:\n  - ghost cream\n  - product b\n");
    let options = RoutineOptions {
        site: batch(),
        ..RoutineOptions::default()
    };

    let yaml = run_routine_with(&site, file.path(), &options).expect("routine should succeed");

    assert!(yaml.contains("SKIP: ghost cream"));
    assert!(yaml.contains("state: skipped"));
}

#[test]
fn cli_routine_with_output_flag_writes_file() {
    let site = two_products();
    let file = routine_file("products:\n  - product a\n");
    let out = tempfile::tempdir().expect("create temp dir");
    let out_path = out.path().join("report.md");
    let options = RoutineOptions {
        site: batch(),
        format: "md".into(),
        output: Some(out_path.clone()),
        ..RoutineOptions::default()
    };

    let message = run_routine_with(&site, file.path(), &options).expect("routine should succeed");

    assert!(message.contains("report written to"));
    let contents = std::fs::read_to_string(&out_path).expect("should read output file");
    assert!(contents.contains("## Presence"));
}

#[test]
fn cli_routine_missing_file_fails() {
    let site = FakeSite::new();
    let err = run_routine_with(
        &site,
        std::path::Path::new("/nonexistent/routine.yaml"),
        &RoutineOptions {
            site: batch(),
            ..RoutineOptions::default()
        },
    )
    .unwrap_err();
    assert!(err.contains("failed to load routine"));
}

#[test]
fn cli_routine_unknown_format_fails() {
    let site = FakeSite::new();
    let file = routine_file("products: []\n");
    let err = run_routine_with(
        &site,
        file.path(),
        &RoutineOptions {
            site: batch(),
            format: "junit".into(),
            ..RoutineOptions::default()
        },
    )
    .unwrap_err();
    assert!(err.contains("unknown format 'junit'"));
    assert!(site.requests().is_empty());
}

#[test]
fn cli_routine_transport_failure_is_an_error() {
    let site = FakeSite::new();
    let file = routine_file("products:\n  - offline product\n");
    let err = run_routine_with(
        &site,
        file.path(),
        &RoutineOptions {
            site: batch(),
            ..RoutineOptions::default()
        },
    )
    .unwrap_err();
    assert!(err.contains("http status: 404"));
}

#[test]
fn cli_routine_uses_name_lookup() {
    let site = two_products();
    let file = routine_file("products:\n  - product a\n  - product b\n");
    let mut names = tempfile::NamedTempFile::new().expect("create temp file");
    write!(names, r#"{{"y01": {{"name": "propanediol"}}}}"#).expect("write names");
    let options = RoutineOptions {
        site: SiteOptions {
            names: Some(names.path().to_owned()),
            ..batch()
        },
        ..RoutineOptions::default()
    };

    let yaml = run_routine_with(&site, file.path(), &options).expect("routine should succeed");
    assert!(yaml.contains("- name: propanediol\n  count: 2"));
}

// ── Single-entity commands ──────────────────────────────────

#[test]
fn cli_product_reports_formulation() {
    let site = two_products();
    let options = ProductOptions {
        site: batch(),
        ..ProductOptions::default()
    };

    let yaml = run_product_with(&site, "product a", &options).expect("product should succeed");

    assert!(yaml.contains("id: p_aaa"));
    assert!(yaml.contains("id: i_x01"));
    assert!(yaml.contains("id: i_y01"));
}

#[test]
fn cli_product_rejects_ingredient_url() {
    let site = FakeSite::new();
    let options = ProductOptions {
        site: batch(),
        url: Some(format!("{BASE}/eng/x01.html")),
        ..ProductOptions::default()
    };
    let err = run_product_with(&site, "", &options).unwrap_err();
    assert!(err.contains("not a detail address for product"));
}

#[test]
fn cli_ingredient_reports_chemistry() {
    let site = FakeSite::new()
        .page(&ingredient_search("56-81-5"), &search_page(&["/eng/g01.html"]))
        .page(
            &format!("{BASE}/eng/g01.html"),
            &ingredient_page("Glycerin", "Glycerol", "Molecular Weight: 92.09 HLB: n/a"),
        );
    let options = IngredientOptions {
        site: batch(),
        cas: Some("56-81-5".into()),
        format: "markdown".into(),
        ..IngredientOptions::default()
    };

    let md = run_ingredient_with(&site, "glycerin", &options).expect("ingredient should succeed");

    assert!(md.starts_with("# Ingredient: glycerin"));
    assert!(md.contains("| 56-81-5 | 92.09 | - |"));
    assert!(md.contains("**Aliases:** glycerol"));
}
