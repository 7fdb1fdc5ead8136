//! Unit tests for CLI commands

use crate::cli::{run_cli_with_output, Cli, Commands};
use clap::Parser;
use std::fs;

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run_cli_with_output(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_view_path_command() {
    let out = run(&[
        "brrtcontroller",
        "view-path",
        "--namespace",
        "Starlit::App",
        "--controller",
        "TestController",
    ])
    .unwrap();
    assert_eq!(out, "starlit/test/index\n");
}

#[test]
fn test_action_method_command() {
    assert_eq!(
        run(&["brrtcontroller", "action-method", "some-other"]).unwrap(),
        "some_other_action\n"
    );
}

#[test]
fn test_render_command() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("shop")).unwrap();
    fs::write(dir.path().join("shop/index.html"), "Hello {{ name }}").unwrap();
    let views = dir.path().to_string_lossy().to_string();

    let out = run(&[
        "brrtcontroller",
        "render",
        "--views",
        &views,
        "--vars",
        r#"{"name": "World"}"#,
        "shop/index",
    ])
    .unwrap();
    assert_eq!(out, "Hello World\n");

    let err = run(&["brrtcontroller", "render", "--views", &views, "--vars", "[1]", "shop/index"])
        .unwrap_err();
    assert!(err.to_string().contains("JSON object"));
}

#[test]
fn test_routes_command() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("app.yaml");
    fs::write(
        &config,
        "routing:\n  routes:\n    - path: /pets/{id}\n      method: GET\n      controller: pet\n      action: show\n",
    )
    .unwrap();
    let config = config.to_string_lossy().to_string();

    let listing = run(&["brrtcontroller", "routes", "--config", &config]).unwrap();
    assert_eq!(listing, "GET /pets/{id} -> pet::show\n");

    let matched = run(&["brrtcontroller", "routes", "--config", &config, "/pets/7"]).unwrap();
    assert_eq!(matched, "/pets/7 -> pet::show (show_action)\n  id = \"7\"\n");

    let conventional =
        run(&["brrtcontroller", "routes", "--config", &config, "/cart/some-other"]).unwrap();
    assert_eq!(conventional, "/cart/some-other -> cart::some-other (some_other_action)\n");
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["brrtcontroller", "view-path", "--controller", "IndexController"],
        vec!["brrtcontroller", "action-method", "index"],
        vec!["brrtcontroller", "render", "shop/index"],
        vec!["brrtcontroller", "routes", "--config", "app.yaml", "--method", "post", "/x"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_render_vars_conflict() {
    let cli = Cli::try_parse_from([
        "brrtcontroller",
        "render",
        "--vars",
        "{}",
        "--vars-file",
        "vars.json",
        "shop/index",
    ]);
    assert!(cli.is_err());

    let cli = Cli::try_parse_from(["brrtcontroller", "render", "x"]).unwrap();
    assert!(matches!(cli.command, Commands::Render { .. }));
}
