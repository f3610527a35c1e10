use clap::Parser;
use foundry::cli::{run_cli, Cli};
use foundry::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(level) = &cli.log_level {
        log_config.log_level = level.clone();
    }
    init_logging(&log_config)?;

    run_cli(cli)
}
