use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kiosk", version, about = "Knowledge-grounded chat kiosk server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP chat server
    Serve,

    /// Enter interactive terminal chat mode against a fresh session
    Chat,

    /// Load the knowledge directory and print what would be served
    Knowledge {
        /// Print the full concatenated blob instead of a summary
        #[arg(short, long)]
        full: bool,
    },
}
