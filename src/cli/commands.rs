use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "blackcard", version, about = "Prospecting and outreach backend for hospitality businesses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP REST API server
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Render outreach for a business described in a JSON file, without a server
    Preview(PreviewArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen port (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// SQLite database path (overrides database.path)
    #[arg(long)]
    pub db: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[derive(Args, Clone)]
pub struct PreviewArgs {
    /// JSON file with the business fields
    pub business: String,

    /// Tone or framework name (defaults to the matched offer's framework)
    #[arg(long)]
    pub tone: Option<String>,

    /// Message language: es or en
    #[arg(long, default_value = "es")]
    pub language: String,

    /// Print the full Black Card package instead of one message set
    #[arg(long)]
    pub blackcard: bool,

    /// YAML configuration file, for loss overrides and sender
    #[arg(short, long)]
    pub config: Option<String>,
}
