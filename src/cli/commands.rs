use crate::config::AppConfig;
use crate::controller::ControllerIdentity;
use crate::router::{action_method_name, Router};
use crate::view::{TemplateRenderer, ViewModel, ViewRenderer};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for brrtcontroller
///
/// Inspect naming conventions and routing configuration, or render a view,
/// without running an application.
#[derive(Parser)]
#[command(name = "brrtcontroller")]
#[command(about = "brrtcontroller CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the default view script for a controller action
    ViewPath {
        /// Declared namespace path, e.g. `Shop::Web`
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Controller type name, e.g. `UserProfileController`
        #[arg(short, long)]
        controller: String,

        /// Action name
        #[arg(short, long, default_value = "index")]
        action: String,
    },
    /// Print the method name an action resolves to
    ActionMethod {
        /// Action name, e.g. `some-other`
        action: String,
    },
    /// Render a view script with JSON variables
    Render {
        /// Views directory
        #[arg(long, env = "BRRTC_VIEWS_DIR", default_value = "views")]
        views: PathBuf,

        /// Template file extension
        #[arg(long, default_value = "html")]
        ext: String,

        /// View script, e.g. `shop/cart/index`
        script: String,

        /// Variables as a JSON object
        #[arg(long, conflicts_with = "vars_file")]
        vars: Option<String>,

        /// File holding variables as a JSON object
        #[arg(long)]
        vars_file: Option<PathBuf>,
    },
    /// Match a path against a configuration's routing rules
    Routes {
        /// YAML or TOML application config
        #[arg(long)]
        config: PathBuf,

        /// Path to match; lists the custom routes when omitted
        path: Option<String>,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,
    },
}

/// Run `cli`, writing results to stdout.
pub fn run_cli(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_cli_with_output(cli, &mut out)
}

/// Run `cli`, writing results to `out`.
pub fn run_cli_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::ViewPath {
            namespace,
            controller,
            action,
        } => {
            let identity = ControllerIdentity::derive(namespace, controller);
            writeln!(out, "{}", identity.view_script(action))?;
            Ok(())
        }
        Commands::ActionMethod { action } => {
            writeln!(out, "{}", action_method_name(action))?;
            Ok(())
        }
        Commands::Render {
            views,
            ext,
            script,
            vars,
            vars_file,
        } => {
            let text = match (vars, vars_file) {
                (Some(v), _) => Some(v.clone()),
                (None, Some(path)) => Some(
                    fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                ),
                (None, None) => None,
            };
            let model = match text {
                Some(text) => model_from_json(&text)?,
                None => ViewModel::new(),
            };
            let renderer = TemplateRenderer::new(views.clone(), ext);
            let rendered = renderer.render(script, &model)?;
            writeln!(out, "{}", rendered)?;
            Ok(())
        }
        Commands::Routes {
            config,
            path,
            method,
        } => {
            let config = AppConfig::load(config)?.with_env_overrides();
            let router = config.router()?;
            let Some(path) = path else {
                for route in router.routes() {
                    let method = route.method().map_or("*", Method::as_str);
                    writeln!(out, "{} {} -> {}", method, route.pattern(), route.target())?;
                }
                return Ok(());
            };
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|_| anyhow!("Invalid HTTP method '{}'", method))?;
            let Some(matched) = router.route(&method, path) else {
                bail!("No route matches {} {}", method, path);
            };
            let mut params: Vec<_> = matched.params.iter().collect();
            params.sort_by(|a, b| a.0.cmp(b.0));
            writeln!(
                out,
                "{} -> {} ({})",
                path,
                matched.target,
                router.action_method(&matched.target.action)
            )?;
            for (name, value) in params {
                writeln!(out, "  {} = {}", name, value)?;
            }
            Ok(())
        }
    }
}

fn model_from_json(text: &str) -> Result<ViewModel> {
    let value: Value = serde_json::from_str(text).context("Variables are not valid JSON")?;
    let Value::Object(map) = value else {
        bail!("Variables must be a JSON object");
    };
    let mut model = ViewModel::new();
    model.extend(map);
    Ok(model)
}
