//! roster person command

use clap::{Args, Subcommand, ValueEnum};
use roster_adapter::store::DocumentStore;
use roster_domain::{SalesPerson, SalesPersonId, SalesPersonRepository, SortBy};
use serde_json::json;

use crate::context::Roster;
use crate::output;

#[derive(Debug, Args)]
pub struct PersonCommand {
    #[command(subcommand)]
    pub command: PersonSubcommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Id,
    Lastname,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => SortBy::Id,
            SortArg::Lastname => SortBy::LastName,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum PersonSubcommand {
    /// Register a new sales person
    Create {
        sid: u32,
        firstname: String,
        lastname: String,
    },
    /// Show one sales person with evaluations
    Get { sid: u32 },
    /// List all sales persons
    List {
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Change the names of a sales person
    Update {
        sid: u32,
        firstname: String,
        lastname: String,
    },
    /// Delete a sales person and their evaluations
    Delete { sid: u32 },
    /// Delete every sales person
    DeleteAll,
}

impl PersonCommand {
    pub async fn run<S: DocumentStore>(&self, roster: &Roster<S>, json: bool) -> anyhow::Result<()> {
        let people = &roster.people;

        match &self.command {
            PersonSubcommand::Create {
                sid,
                firstname,
                lastname,
            } => {
                let person = SalesPerson::new(SalesPersonId::new(*sid)?, firstname, lastname)?;
                people.create(&person).await?;
                if json {
                    output::print_json(&output::person_json(&person))?;
                } else {
                    output::done(&format!("Created {} {}", sid, person.full_name()));
                }
            }
            PersonSubcommand::Get { sid } => {
                let person = people.get_by_id(SalesPersonId::new(*sid)?).await?;
                if json {
                    output::print_json(&output::person_json(&person))?;
                } else {
                    output::print_person(&person);
                    for evaluation in output::evaluations_of(&person) {
                        output::print_evaluation(&evaluation);
                    }
                }
            }
            PersonSubcommand::List { sort } => {
                let all = people.get_all(sort.map(SortBy::from)).await?;
                if json {
                    let items: Vec<_> = all.items.iter().map(output::person_json).collect();
                    let skipped: Vec<_> = all
                        .skipped
                        .iter()
                        .map(|s| json!({ "key": s.key, "reason": s.reason }))
                        .collect();
                    output::print_json(&json!({ "items": items, "skipped": skipped }))?;
                } else {
                    for person in &all.items {
                        output::print_person(person);
                    }
                    if !all.is_complete() {
                        eprintln!("{} record(s) could not be read", all.skipped.len());
                    }
                }
            }
            PersonSubcommand::Update {
                sid,
                firstname,
                lastname,
            } => {
                let mut person = people.get_by_id(SalesPersonId::new(*sid)?).await?;
                person.rename(firstname, lastname)?;
                people.update(&person).await?;
                if json {
                    output::print_json(&output::person_json(&person))?;
                } else {
                    output::done(&format!("Updated {}", sid));
                }
            }
            PersonSubcommand::Delete { sid } => {
                people.delete_by_id(SalesPersonId::new(*sid)?).await?;
                if json {
                    output::print_json(&json!({ "deleted": sid }))?;
                } else {
                    output::done(&format!("Deleted {}", sid));
                }
            }
            PersonSubcommand::DeleteAll => {
                let removed = people.delete_all().await?;
                if json {
                    output::print_json(&json!({ "deleted": removed }))?;
                } else {
                    output::done(&format!("Deleted {} sales person(s)", removed));
                }
            }
        }
        Ok(())
    }
}
