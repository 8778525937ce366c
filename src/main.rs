use clap::Parser;
use std::process;
use workload_compliance::{apply_overrides, cli::Cli, config, run_command};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> workload_compliance::Result<()> {
    let cli = Cli::parse();

    cli.init_logging();

    let mut config = config::load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    run_command(cli.command, &config).await
}
