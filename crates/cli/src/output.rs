//! Human and JSON renderings of roster entities

use console::style;
use roster_domain::{LedgerPolicy, PerformanceEvaluation, SalesPerson};
use serde_json::{json, Value};

/// Evaluations as the ledger reads them: year descending, one per year
pub fn evaluations_of(person: &SalesPerson) -> Vec<PerformanceEvaluation> {
    LedgerPolicy::new().view(person.evaluations()).evaluations
}

pub fn person_json(person: &SalesPerson) -> Value {
    json!({
        "sid": person.id().value(),
        "firstname": person.first_name(),
        "lastname": person.last_name(),
        "performanceRecords": evaluations_of(person)
            .iter()
            .map(evaluation_json)
            .collect::<Vec<_>>(),
    })
}

pub fn evaluation_json(evaluation: &PerformanceEvaluation) -> Value {
    let mut value = json!({
        "salesmanId": evaluation.sales_person_id().value(),
        "year": evaluation.year(),
    });
    if let Some(map) = value.as_object_mut() {
        for (name, score) in evaluation.scores().iter() {
            map.insert(name.to_string(), json!(score));
        }
    }
    value
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_person(person: &SalesPerson) {
    println!(
        "{} {} ({} evaluations)",
        style(person.id()).bold(),
        person.full_name(),
        evaluations_of(person).len()
    );
}

pub fn print_evaluation(evaluation: &PerformanceEvaluation) {
    let scores: Vec<String> = evaluation
        .scores()
        .iter()
        .map(|(name, score)| format!("{}={}", name, score))
        .collect();
    println!(
        "  {}  {}  total {}",
        style(evaluation.year()).cyan(),
        scores.join(" "),
        evaluation.scores().total()
    );
}

pub fn done(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_domain::{SalesPersonId, TraitScores};

    #[test]
    fn test_evaluation_json_uses_stored_field_names() {
        let id = SalesPersonId::new(1001).unwrap();
        let evaluation =
            PerformanceEvaluation::new(id, 2024, TraitScores::new(4, 3, 4, 5, 4, 4).unwrap());

        let value = evaluation_json(&evaluation);

        assert_eq!(value["salesmanId"], 1001);
        assert_eq!(value["year"], 2024);
        assert_eq!(value["leadership"], 4);
        assert_eq!(value["attitude"], 5);
    }

    #[test]
    fn test_person_json_lists_latest_year_first() {
        let id = SalesPersonId::new(1001).unwrap();
        let scores = TraitScores::new(4, 3, 4, 5, 4, 4).unwrap();
        let person = SalesPerson::new(id, "John", "Smith")
            .unwrap()
            .with_evaluations([
                PerformanceEvaluation::new(id, 2021, scores),
                PerformanceEvaluation::new(id, 2024, scores),
                PerformanceEvaluation::new(id, 2022, scores),
            ])
            .unwrap();

        let value = person_json(&person);

        let years: Vec<_> = value["performanceRecords"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["year"].as_i64().unwrap())
            .collect();
        assert_eq!(years, vec![2024, 2022, 2021]);
    }

    #[test]
    fn test_person_json() {
        let id = SalesPersonId::new(7).unwrap();
        let person = SalesPerson::new(id, "Jane", "Doe").unwrap();

        let value = person_json(&person);

        assert_eq!(value["sid"], 7);
        assert_eq!(value["lastname"], "Doe");
        assert_eq!(value["performanceRecords"], json!([]));
    }
}
