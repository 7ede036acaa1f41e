//! roster dump command

use clap::Args;
use roster_adapter::store::{DocumentStore, Filter, FindOptions};
use serde_json::Value;

use crate::context::Roster;
use crate::output;

/// Print the raw stored documents, unmapped and unsorted
#[derive(Debug, Args)]
pub struct DumpCommand {}

impl DumpCommand {
    pub async fn run<S: DocumentStore>(&self, roster: &Roster<S>) -> anyhow::Result<Vec<Value>> {
        let collection = roster.people.collection();
        let docs: Vec<Value> = roster
            .store
            .find(collection, &Filter::all(), &FindOptions::default())
            .await?
            .into_iter()
            .map(Value::Object)
            .collect();

        output::print_json(&serde_json::json!({ "collection": collection, "documents": docs }))?;
        Ok(docs)
    }
}
