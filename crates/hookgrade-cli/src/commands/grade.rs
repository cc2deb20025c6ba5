//! `hookgrade grade` -- grade one hook from the terminal.
//!
//! Runs the same backend chain and fallback as the HTTP API, without the
//! quota gate.
//!
//! # Examples
//!
//! ```text
//! hookgrade grade "I was today years old..." --category Beverage
//! hookgrade grade "Stop buying protein bars." --platform "Meta Ad" --json
//! ```

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use hookgrade_services::{GradeOutcome, GradingOrchestrator};
use hookgrade_types::{GradeRequest, Platform};

use super::load_config;

/// Arguments for the `hookgrade grade` subcommand.
#[derive(Args)]
pub struct GradeArgs {
    /// The hook text to grade.
    pub hook: String,

    /// Platform label (TikTok, Instagram Reel, Meta Ad, YouTube Short, or free text).
    #[arg(long, default_value = "TikTok")]
    pub platform: String,

    /// Product category (defaults to "General").
    #[arg(long)]
    pub category: Option<String>,

    /// Print the raw JSON result instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the `grade` command.
pub async fn run(args: GradeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let request = GradeRequest::new(
        args.hook,
        Platform::from_label(&args.platform),
        args.category.unwrap_or_default(),
    )?;

    let orchestrator = GradingOrchestrator::from_config(&config);
    let outcome = orchestrator.grade(&request).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else {
        print_outcome(&request, &outcome);
    }
    Ok(())
}

fn print_outcome(request: &GradeRequest, outcome: &GradeOutcome) {
    let result = &outcome.result;
    println!(
        "Hook: \"{}\"  ({} / {})",
        request.hook, request.platform, request.category
    );
    println!("Overall: {}/100  (source: {})", result.overall_score, outcome.source);
    if outcome.source.is_fallback() {
        println!("warning: every backend failed; this is the canned example result");
    }
    println!();

    let mut dimensions = Table::new();
    dimensions.load_preset(UTF8_FULL);
    dimensions.set_header(["DIMENSION", "SCORE", "WHY"]);
    for d in &result.dimensions {
        let score = format!("{}/20", d.score);
        dimensions.add_row([d.name.as_str(), score.as_str(), d.explanation.as_str()]);
    }
    println!("{dimensions}");

    let mut alternatives = Table::new();
    alternatives.load_preset(UTF8_FULL);
    alternatives.set_header(["ANGLE", "HOOK", "WHY"]);
    for a in &result.alternatives {
        alternatives.add_row([a.label.as_str(), a.hook.as_str(), a.explanation.as_str()]);
    }
    println!("{alternatives}");
}
