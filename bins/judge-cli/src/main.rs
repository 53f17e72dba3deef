mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "judge-cli")]
#[command(about = "Judge CLI - Build and inspect grading payloads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON problem file into a runner payload
    Encode {
        /// Path to the problem JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Decode a runner payload back into pretty JSON
    Decode {
        /// Base64 payload as passed to judge-runner
        #[arg(short, long)]
        payload: String,
    },

    /// Summarize what the runner will do with a payload
    Inspect {
        /// Base64 payload as passed to judge-runner
        #[arg(short, long)]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { file } => {
            println!("{}", commands::encode_file(&file).await?);
        }
        Commands::Decode { payload } => {
            println!("{}", commands::decode_payload(&payload)?);
        }
        Commands::Inspect { payload } => {
            print!("{}", commands::inspect_payload(&payload)?);
        }
    }

    Ok(())
}
