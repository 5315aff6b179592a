//! Medicine lookup commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use medsafe_core::models::Medicine;

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct MedicineCommand {
    #[command(subcommand)]
    pub command: MedicineSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MedicineSubcommand {
    /// Search medicines by name or ingredient
    Search { keyword: String },

    /// Show one medicine
    Show { id: String },
}

pub async fn handle(cmd: MedicineCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        MedicineSubcommand::Search { keyword } => {
            let medicines = ctx
                .client
                .search_medicines(&keyword)
                .await
                .context("Failed to search medicines")?;

            if ctx.json {
                return output::json_pretty(&medicines);
            }
            if medicines.is_empty() {
                output::hint(&format!("No medicines match '{}'.", keyword));
                return Ok(());
            }
            for medicine in &medicines {
                print_summary(medicine);
            }
        }
        MedicineSubcommand::Show { id } => {
            let medicine = ctx
                .client
                .medicine(&id)
                .await
                .context("Failed to fetch medicine")?;

            if ctx.json {
                return output::json_pretty(&medicine);
            }
            output::field("Name", &medicine.name);
            output::field_opt("ID", medicine.id.as_deref());
            output::field_opt("Company", medicine.company.as_deref());
            if !medicine.ingredients.is_empty() {
                output::field("Ingredients", &medicine.ingredients.join(", "));
            }
            output::field_opt("Description", medicine.description.as_deref());
        }
    }
    Ok(())
}

fn print_summary(medicine: &Medicine) {
    let id = medicine.id.as_deref().unwrap_or("-");
    match &medicine.company {
        Some(company) => println!("{}  {} ({})", id, medicine.name, company),
        None => println!("{}  {}", id, medicine.name),
    }
}
