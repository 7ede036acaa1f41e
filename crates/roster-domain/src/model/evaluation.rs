//! PerformanceEvaluation - One year of social-performance scores
//!
//! PerformanceEvaluation is a Value Object. It has no identity of its own:
//! within its owning SalesPerson it is keyed by `year`.

use super::sales_person::{SalesPersonId, ValidationError};

/// Highest score any trait may receive
pub const MAX_SCORE: u8 = 5;

/// The six social traits scored each year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraitScores {
    leadership: u8,
    openness: u8,
    behaviour: u8,
    attitude: u8,
    communication: u8,
    integrity: u8,
}

impl TraitScores {
    /// Names in the order the scores are declared
    pub const NAMES: [&'static str; 6] = [
        "leadership",
        "openness",
        "behaviour",
        "attitude",
        "communication",
        "integrity",
    ];

    /// Build a score set, rejecting anything outside [0, MAX_SCORE]
    pub fn new(
        leadership: i64,
        openness: i64,
        behaviour: i64,
        attitude: i64,
        communication: i64,
        integrity: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            leadership: score("leadership", leadership)?,
            openness: score("openness", openness)?,
            behaviour: score("behaviour", behaviour)?,
            attitude: score("attitude", attitude)?,
            communication: score("communication", communication)?,
            integrity: score("integrity", integrity)?,
        })
    }

    pub fn leadership(&self) -> u8 {
        self.leadership
    }

    pub fn openness(&self) -> u8 {
        self.openness
    }

    pub fn behaviour(&self) -> u8 {
        self.behaviour
    }

    pub fn attitude(&self) -> u8 {
        self.attitude
    }

    pub fn communication(&self) -> u8 {
        self.communication
    }

    pub fn integrity(&self) -> u8 {
        self.integrity
    }

    /// (name, score) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        let values = [
            self.leadership,
            self.openness,
            self.behaviour,
            self.attitude,
            self.communication,
            self.integrity,
        ];
        Self::NAMES.into_iter().zip(values)
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, v)| u32::from(v)).sum()
    }
}

fn score(name: &'static str, value: i64) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_SCORE)
        .ok_or(ValidationError::ScoreOutOfRange { name, value })
}

/// PerformanceEvaluation - part B of a yearly bonus sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerformanceEvaluation {
    sales_person_id: SalesPersonId,
    year: i32,
    scores: TraitScores,
}

impl PerformanceEvaluation {
    pub fn new(sales_person_id: SalesPersonId, year: i32, scores: TraitScores) -> Self {
        Self {
            sales_person_id,
            year,
            scores,
        }
    }

    pub fn sales_person_id(&self) -> SalesPersonId {
        self.sales_person_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn scores(&self) -> &TraitScores {
        &self.scores
    }
}
