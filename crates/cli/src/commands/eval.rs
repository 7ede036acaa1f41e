//! roster eval command

use clap::{Args, Subcommand};
use roster_adapter::store::DocumentStore;
use roster_domain::{AppendOutcome, PerformanceEvaluation, PerformanceLedger, SalesPersonId, TraitScores};
use serde_json::json;

use crate::context::Roster;
use crate::output;

#[derive(Debug, Args)]
pub struct EvalCommand {
    #[command(subcommand)]
    pub command: EvalSubcommand,
}

/// The six trait scores, each 0 to 5
#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long)]
    pub leadership: i64,
    #[arg(long)]
    pub openness: i64,
    #[arg(long)]
    pub behaviour: i64,
    #[arg(long)]
    pub attitude: i64,
    #[arg(long)]
    pub communication: i64,
    #[arg(long)]
    pub integrity: i64,
}

impl ScoreArgs {
    fn to_scores(&self) -> anyhow::Result<TraitScores> {
        Ok(TraitScores::new(
            self.leadership,
            self.openness,
            self.behaviour,
            self.attitude,
            self.communication,
            self.integrity,
        )?)
    }
}

#[derive(Debug, Subcommand)]
pub enum EvalSubcommand {
    /// Record the evaluation for a year, replacing any existing one
    Add {
        sid: u32,
        year: i32,
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// List evaluations, most recent first
    List { sid: u32 },
    /// Show the evaluation for one year
    Get { sid: u32, year: i32 },
    /// Show the most recent evaluation
    Latest { sid: u32 },
    /// Remove the evaluation for one year
    Remove { sid: u32, year: i32 },
    /// Remove the most recent evaluation
    RemoveLatest { sid: u32 },
}

impl EvalCommand {
    pub async fn run<S: DocumentStore>(&self, roster: &Roster<S>, json: bool) -> anyhow::Result<()> {
        let ledger = &roster.ledger;

        match &self.command {
            EvalSubcommand::Add { sid, year, scores } => {
                let id = SalesPersonId::new(*sid)?;
                let evaluation = PerformanceEvaluation::new(id, *year, scores.to_scores()?);
                let outcome = ledger.append(id, evaluation).await?;
                let verb = match outcome {
                    AppendOutcome::Appended => "appended",
                    AppendOutcome::Replaced => "replaced",
                };
                if json {
                    output::print_json(&json!({
                        "outcome": verb,
                        "evaluation": output::evaluation_json(&evaluation),
                    }))?;
                } else {
                    output::done(&format!("Evaluation {} for {} {}", year, sid, verb));
                }
            }
            EvalSubcommand::List { sid } => {
                let all = ledger.list_all(SalesPersonId::new(*sid)?).await?;
                if json {
                    let items: Vec<_> = all.iter().map(output::evaluation_json).collect();
                    output::print_json(&json!(items))?;
                } else if all.is_empty() {
                    println!("No evaluations for {}", sid);
                } else {
                    all.iter().for_each(output::print_evaluation);
                }
            }
            EvalSubcommand::Get { sid, year } => {
                let found = ledger.list_by_year(SalesPersonId::new(*sid)?, *year).await?;
                match (found, json) {
                    (Some(evaluation), true) => {
                        output::print_json(&output::evaluation_json(&evaluation))?
                    }
                    (Some(evaluation), false) => output::print_evaluation(&evaluation),
                    (None, true) => output::print_json(&serde_json::Value::Null)?,
                    (None, false) => println!("No evaluation for {} in {}", sid, year),
                }
            }
            EvalSubcommand::Latest { sid } => {
                let evaluation = ledger.latest(SalesPersonId::new(*sid)?).await?;
                if json {
                    output::print_json(&output::evaluation_json(&evaluation))?;
                } else {
                    output::print_evaluation(&evaluation);
                }
            }
            EvalSubcommand::Remove { sid, year } => {
                let removed = ledger.remove_by_year(SalesPersonId::new(*sid)?, *year).await?;
                if json {
                    output::print_json(&json!({ "removed": removed }))?;
                } else {
                    output::done(&format!("Removed {} evaluation(s)", removed));
                }
            }
            EvalSubcommand::RemoveLatest { sid } => {
                let evaluation = ledger.remove_latest(SalesPersonId::new(*sid)?).await?;
                if json {
                    output::print_json(&output::evaluation_json(&evaluation))?;
                } else {
                    output::done(&format!("Removed evaluation {}", evaluation.year()));
                }
            }
        }
        Ok(())
    }
}
