use anyhow::Result;
use archlens::cli::{Cli, Commands};
use archlens::commands::{audit_project, init_config, AuditCommand};
use clap::Parser;
use env_logger::Env;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            model,
            config,
            format,
            output,
            plain,
            verbosity,
        } => {
            init_logging(verbosity);
            let passed = audit_project(AuditCommand {
                model,
                config,
                format,
                output,
                plain,
                verbosity,
            })?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => {
            init_logging(0);
            init_config(force)
        }
    }
}
