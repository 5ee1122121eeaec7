use std::path::PathBuf;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use grit_cli::{generate, init_logging, inspect, GenerateOptions, LogFormat};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "GRIT Grafana alert rule generator")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile alert groups and write provisioning files
    Generate(Target),

    /// Compile alert groups and print a summary without writing
    Inspect(Target),
}

#[derive(ClapArgs, Debug)]
struct Target {
    #[arg(long, default_value = "./config")]
    config_dir: PathBuf,

    #[arg(long)]
    env: String,

    /// Output root, overrides output_dir from the environment config
    #[arg(long)]
    out: Option<PathBuf>,

    /// Treat unparseable time range tokens as 0 instead of failing
    #[arg(long)]
    lenient_time_ranges: bool,
}

impl Target {
    fn options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new(&self.config_dir, &self.env)
            .with_lenient_time_ranges(self.lenient_time_ranges);
        if let Some(out) = &self.out {
            options = options.with_out(out);
        }
        options
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_format)?;

    match args.command {
        Command::Generate(target) => {
            info!("Generating alerts for environment: {}", target.env);
            for path in generate(&target.options())? {
                println!("{}", path.display());
            }
        }
        Command::Inspect(target) => {
            for group in inspect(&target.options())? {
                println!("{} [{}] uid={} -> {}", group.name, group.folder, group.uid, group.path.display());
                for title in &group.rules {
                    println!("  - {}", title);
                }
            }
        }
    }

    Ok(())
}
