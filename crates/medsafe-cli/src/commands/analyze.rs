//! Analysis commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use medsafe_core::models::{OcrAnalysis, OcrStatus, SideEffectRequest, SymptomAnalysis};

use crate::output;
use crate::session::AppContext;

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    #[command(subcommand)]
    pub command: AnalyzeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AnalyzeSubcommand {
    /// Submit a symptom for analysis and print the analysis ID
    Symptom {
        /// Free-text symptom description
        text: String,
    },

    /// Fetch the result of a symptom analysis
    Result { id: String },

    /// Look for ingredients shared by medicines that caused side effects
    SideEffect(SideEffectArgs),

    /// Analyze a photo of an ingredient label
    Ocr {
        /// Image file (JPEG, PNG, ...)
        image: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SideEffectArgs {
    /// Medicine name; repeat for each medicine
    #[arg(long = "medication", required = true)]
    pub medications: Vec<String>,

    /// What happened
    #[arg(long)]
    pub description: Option<String>,
}

pub async fn handle(cmd: AnalyzeCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AnalyzeSubcommand::Symptom { text } => {
            let ticket = ctx
                .client
                .request_symptom_analysis(&text)
                .await
                .context("Failed to submit symptom")?;

            if ctx.json {
                return output::json_pretty(&ticket);
            }
            output::success("Symptom submitted");
            output::field("Analysis ID", &ticket.analysis_id);
            output::hint(&format!(
                "Fetch the result with 'medsafe analyze result {}'.",
                ticket.analysis_id
            ));
        }
        AnalyzeSubcommand::Result { id } => {
            let analysis = ctx
                .client
                .analysis_result(&id)
                .await
                .context("Failed to fetch analysis")?;

            if ctx.json {
                return output::json_pretty(&analysis);
            }
            print_symptom_analysis(&analysis);
        }
        AnalyzeSubcommand::SideEffect(args) => {
            let request = SideEffectRequest {
                user_id: None,
                medication_names: args.medications,
                description: args.description,
            };
            let analysis = ctx
                .client
                .analyze_side_effects(&request)
                .await
                .context("Failed to analyze side effects")?;

            if ctx.json {
                return output::json_pretty(&analysis);
            }
            if !analysis.common_ingredients.is_empty() {
                output::field("Shared ingredients", &analysis.common_ingredients.join(", "));
            }
            for sensitive in &analysis.user_sensitive_ingredients {
                println!(
                    "{} {}: {}",
                    "!".red(),
                    sensitive.ingredient_name,
                    sensitive.reason
                );
            }
            for common in &analysis.common_side_effect_ingredients {
                println!(
                    "- {}: {}",
                    common.ingredient_name, common.side_effect_description
                );
            }
            output::field_opt("Summary", Some(analysis.summary.as_str()));
        }
        AnalyzeSubcommand::Ocr { image } => {
            output::hint("Uploading image...");
            let analysis = ctx
                .client
                .analyze_image_file(&image)
                .await
                .context("Failed to analyze image")?;

            if ctx.json {
                return output::json_pretty(&analysis);
            }
            print_ocr(&analysis);
        }
    }
    Ok(())
}

fn print_symptom_analysis(analysis: &SymptomAnalysis) {
    if !analysis.recommended_medications.is_empty() {
        println!("{}", "Recommended".green().bold());
        for medication in &analysis.recommended_medications {
            println!("  {} - {}", medication.name, medication.reason);
        }
    }
    if !analysis.medications_to_avoid.is_empty() {
        println!("{}", "Avoid".red().bold());
        for medication in &analysis.medications_to_avoid {
            println!(
                "  {} - {} ({:?})",
                medication.name, medication.reason, medication.risk_level
            );
        }
    }
    let summary = &analysis.risk_summary;
    for warning in &summary.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    output::field_opt("Summary", Some(summary.gpt_analysis.as_str()));
}

fn print_ocr(analysis: &OcrAnalysis) {
    let findings = &analysis.analysis;
    let status = match findings.status {
        OcrStatus::Safe => "SAFE".green(),
        OcrStatus::Caution => "CAUTION".yellow(),
        OcrStatus::HighRisk => "HIGH RISK".red().bold(),
    };
    output::field("Status", &status.to_string());
    if !analysis.normalized_ingredients.is_empty() {
        output::field("Ingredients", &analysis.normalized_ingredients.join(", "));
    }
    if !findings.matching_allergens.is_empty() {
        output::field("Matching allergens", &findings.matching_allergens.join(", "));
    }
    for warning in &findings.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    output::field_opt("Summary", Some(findings.gpt_summary.as_str()));
}
