use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "birthdays")]
#[command(about = "Collects birthday submissions into a JSON file in cloud storage")]
pub struct Cli {
    #[arg(long, help = "TOML config file (otherwise BIRTHDAYS_* environment variables)")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the web form (default)
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
    /// Print every stored submission as JSON
    Dump,
    /// Append one submission
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        month: String,
        #[arg(long)]
        reddit: String,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            bind: "127.0.0.1:3000".to_string(),
        })
    }
}
