use clap::Parser;

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct CmdParser {
    #[command(subcommand)]
    pub command: Command,
}
