//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::allergy::AllergyCommand;
use crate::commands::analyze::AnalyzeCommand;
use crate::commands::auth::AuthCommand;
use crate::commands::comment::CommentCommand;
use crate::commands::medicine::MedicineCommand;
use crate::commands::post::PostCommand;

/// Medication safety assistant: allergies, medicine lookup and analysis.
#[derive(Parser, Debug)]
#[command(name = "medsafe")]
#[command(author, version = env!("MEDSAFE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Print command results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL
    #[arg(long, env = "API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Credential file location
    #[arg(long, env = "MEDSAFE_CREDENTIALS_FILE", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Keep tokens in the OS keyring instead of a file
    #[cfg(feature = "keyring")]
    #[arg(long, global = true)]
    pub keyring: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, sign up and manage the session
    Auth(AuthCommand),

    /// Manage registered allergy ingredients
    Allergy(AllergyCommand),

    /// Look up medicines
    Medicine(MedicineCommand),

    /// Symptom, side-effect and label analysis
    Analyze(AnalyzeCommand),

    /// Community posts
    Post(PostCommand),

    /// Comments on community posts
    Comment(CommentCommand),
}
