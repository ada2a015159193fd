//! Clap derive structures for the `panop` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// panop -- run operational commands on PAN-OS firewalls
#[derive(Debug, Parser)]
#[command(
    name = "panop",
    version,
    about = "Run operational commands on PAN-OS firewalls",
    long_about = "Compiles command words into the nested-tag form the XML API expects,\n\
        exchanges your credentials for a session key, and prints the raw response.\n\n\
        A trailing word containing '-' or '.', or the word 'all', is sent as a\n\
        bare value:  panop lan1 show arp all  ->  <show><arp>all</arp></show>",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print diagnostics (token counts, compiled command, key, response); repeat for logs
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run each non-blank line of FILE as a separate command
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Operational command timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Which closing tags the compiled command carries
    #[arg(long, value_enum)]
    pub closing: Option<ClosingMode>,

    /// Also write each raw response to DIR/<target>/<words>.txt
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Config file path (defaults to the platform config directory)
    #[arg(long, env = "PANOP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Firewall name; must contain "lan" or "wan"
    pub target: String,

    /// Command words, optionally ending in a value (address, range, dashed name, "all")
    #[arg(
        value_name = "WORD",
        required_unless_present = "file",
        conflicts_with = "file",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 1..
    )]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClosingMode {
    /// Close every tag
    Balanced,
    /// Leave the outermost tag open
    OmitOutermost,
}
