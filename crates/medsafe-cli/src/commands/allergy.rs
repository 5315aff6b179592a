//! Allergy commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use medsafe_core::models::{Allergy, NewAllergy};

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct AllergyCommand {
    #[command(subcommand)]
    pub command: AllergySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AllergySubcommand {
    /// List registered allergy ingredients
    List,

    /// Register an allergy ingredient
    Add {
        /// Ingredient name, e.g. "penicillin"
        ingredient: String,
    },

    /// Remove a registered allergy
    Remove {
        /// Allergy ID as shown by `allergy list`
        id: String,
    },
}

pub async fn handle(cmd: AllergyCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AllergySubcommand::List => {
            let allergies = ctx
                .client
                .list_allergies()
                .await
                .context("Failed to list allergies")?;

            if ctx.json {
                return output::json_pretty(&allergies);
            }
            if allergies.is_empty() {
                output::hint("No allergies registered.");
                return Ok(());
            }
            for allergy in &allergies {
                print_allergy(allergy);
            }
        }
        AllergySubcommand::Add { ingredient } => {
            let ingredient = ingredient.trim();
            if ingredient.is_empty() {
                anyhow::bail!("Ingredient must not be empty");
            }
            let allergy = ctx
                .client
                .add_allergy(&NewAllergy::new(ingredient))
                .await
                .context("Failed to add allergy")?;

            if ctx.json {
                return output::json_pretty(&allergy);
            }
            output::success(&format!("Registered {}", allergy.ingredient));
            output::field("ID", &allergy.id);
        }
        AllergySubcommand::Remove { id } => {
            ctx.client
                .remove_allergy(&id)
                .await
                .context("Failed to remove allergy")?;
            if !ctx.json {
                output::success(&format!("Removed allergy {}", id));
            }
        }
    }
    Ok(())
}

fn print_allergy(allergy: &Allergy) {
    let mut line = format!("{}  {}", allergy.id, allergy.ingredient);
    if let Some(severity) = allergy.severity {
        line.push_str(&format!("  [{:?}]", severity));
    }
    if let Some(created_at) = &allergy.created_at {
        line.push_str(&format!("  (added {})", output::timestamp(created_at)));
    }
    println!("{}", line);
}
