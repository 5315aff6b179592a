//! Subcommand implementations.

pub mod allergy;
pub mod analyze;
pub mod auth;
pub mod comment;
pub mod medicine;
pub mod post;

use anyhow::Result;

use crate::cli::Commands;
use crate::session::AppContext;

pub async fn dispatch(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Auth(cmd) => auth::handle(cmd, ctx).await,
        Commands::Allergy(cmd) => allergy::handle(cmd, ctx).await,
        Commands::Medicine(cmd) => medicine::handle(cmd, ctx).await,
        Commands::Analyze(cmd) => analyze::handle(cmd, ctx).await,
        Commands::Post(cmd) => post::handle(cmd, ctx).await,
        Commands::Comment(cmd) => comment::handle(cmd, ctx).await,
    }
}
