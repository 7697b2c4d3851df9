use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
pub mod ux_error;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Args(args) => commands::inputs::run(args, commands::inputs::View::Typed).await,
        Commands::Resolved(args) => {
            commands::inputs::run(args, commands::inputs::View::Resolved).await
        }
        Commands::MethodName(args) => commands::variable::method_name(args),
        Commands::ParseVariable(args) => commands::variable::parse_variable(args),
    }
}
