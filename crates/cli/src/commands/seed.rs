//! roster seed command

use clap::Args;
use roster_adapter::store::DocumentStore;
use roster_domain::{
    PerformanceEvaluation, PerformanceLedger, RepositoryError, SalesPerson, SalesPersonId,
    SalesPersonRepository, TraitScores,
};
use tracing::info;

use crate::context::Roster;
use crate::output;

/// Load a small demo roster
///
/// Safe to run again: existing people are kept and the 2024 evaluation
/// is replaced in place.
#[derive(Debug, Args)]
pub struct SeedCommand {}

impl SeedCommand {
    pub async fn run<S: DocumentStore>(&self, roster: &Roster<S>, json: bool) -> anyhow::Result<()> {
        let john = SalesPersonId::new(1001)?;
        let jane = SalesPersonId::new(1002)?;
        let mut created = 0;

        for person in [
            SalesPerson::new(john, "John", "Smith")?,
            SalesPerson::new(jane, "Jane", "Doe")?,
        ] {
            match roster.people.create(&person).await {
                Ok(()) => created += 1,
                Err(RepositoryError::DuplicateKey { id }) => {
                    info!(id = %id, "Already seeded");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let evaluation =
            PerformanceEvaluation::new(john, 2024, TraitScores::new(4, 3, 4, 5, 4, 4)?);
        roster.ledger.append(john, evaluation).await?;

        if json {
            output::print_json(&serde_json::json!({ "created": created }))?;
        } else {
            output::done(&format!("Seeded {} sales person(s)", created));
        }
        Ok(())
    }
}
