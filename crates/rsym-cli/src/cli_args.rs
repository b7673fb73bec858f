use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "rsym")]
#[command(about = "Generate typed resource accessor symbols from parsed resource records")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Directory holding `*.json` resource record bundles.
    #[arg(long = "resources")]
    pub(crate) resources: String,
    /// JSON file with generator options.
    #[arg(long = "config")]
    pub(crate) config: Option<String>,
    /// Output file; the tree goes to stdout when omitted.
    #[arg(long = "out")]
    pub(crate) out: Option<String>,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Json)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Outline,
}
