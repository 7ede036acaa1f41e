//! Domain Models - The vocabulary of the roster
//!
//! A SalesPerson is the aggregate root; PerformanceEvaluations
//! only exist inside one.

pub mod evaluation;
pub mod sales_person;
