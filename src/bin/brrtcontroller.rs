use brrtcontroller::cli::{run_cli, Cli};
use brrtcontroller::logging::{init_logging_with_config, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let mut log_config = LogConfig::from_env();
    log_config.async_logging = false;
    if std::env::var("BRRTC_LOG_LEVEL").is_err() {
        log_config.log_level = "error".to_string();
    }
    let _guard = init_logging_with_config(&log_config)?;

    run_cli(Cli::parse())
}
