use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compliance-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate Kubernetes workloads and export compliance gauges")]
#[command(long_about = "Watches Deployments and ReplicaSets, checks them against the registered compliance rules, and exposes one Prometheus gauge per rule labeled by namespace, name and kind.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Restrict listing and watching to one namespace
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the cluster, sweep periodically and serve /metrics
    Run {
        /// Seconds between full sweeps
        #[arg(long)]
        sweep_interval: Option<u64>,

        /// Port for the metrics endpoint
        #[arg(long)]
        port: Option<u16>,

        /// Host address for the metrics endpoint
        #[arg(long)]
        host: Option<String>,
    },

    /// Run a single sweep and print the resulting gauges
    Sweep {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List registered rules and the kinds they apply to
    Rules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Prometheus text exposition format
    Text,
    Json,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
