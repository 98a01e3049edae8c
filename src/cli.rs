use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "credwatch")]
#[command(about = "CLI client for the hosted credentials table", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print all credential rows
    List,

    /// Insert one credential row
    Create {
        /// Email, the unique row key
        #[arg(long)]
        email: String,

        /// Password stored verbatim by the backend
        #[arg(long)]
        password: String,
    },

    /// Set a new password for the matching email
    Update {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Remove the row matching an email
    Delete {
        #[arg(long)]
        email: String,
    },

    /// Stream row change events until interrupted
    Realtime,
}
