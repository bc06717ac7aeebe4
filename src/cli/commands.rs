use clap::{Parser, Subcommand};

/// Parley - streaming conversational CLI for Google's generative-language API.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Chat with a generative model, with per-session transcripts.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a chat session (interactive unless --message is given)
    Chat {
        /// Single message mode (don't enter the interactive loop)
        #[arg(short, long)]
        message: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long)]
        temperature: Option<f64>,
    },

    /// Show configuration status
    Status,

    /// Set the default model
    Model {
        /// Model name, e.g. gemini-2.0-flash
        set: String,
    },
}
