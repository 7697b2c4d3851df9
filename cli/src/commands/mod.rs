pub mod inputs;
pub mod variable;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "inputs",
    author,
    version,
    about = "Inspect the layered inputs of an app invocation",
    long_about = "Runs the inputs engine over an app command line and prints the result.\n\nApp \
                  arguments go after `--`. Sources are merged in order: config file, command \
                  line, results file, queued params, secure params."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the typed inputs as JSON")]
    Args(inputs::InputsArgs),

    #[command(about = "Print the resolved inputs as JSON")]
    Resolved(inputs::InputsArgs),

    #[command(about = "Print the method name derived from a variable")]
    MethodName(variable::VariableArgs),

    #[command(about = "Print a parsed variable as JSON")]
    ParseVariable(variable::VariableArgs)
}
