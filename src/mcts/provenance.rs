//! Which model served inference for which moves.
//!
//! Records are appended in play order and never removed. A new record starts
//! whenever the serving model changes, so a game that switches models mid-way
//! shows one record per contiguous run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRecord {
    pub model: String,
    /// Move number of the search root when this model was first used.
    pub first_move: usize,
    /// Move number of the search root at its most recent use.
    pub last_move: usize,
    /// Positions evaluated by this model over the run.
    pub total_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InferenceLog {
    records: Vec<InferenceRecord>,
}

impl InferenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes that `model` evaluated `count` positions while searching from a
    /// root at `move_number`.
    pub fn record(&mut self, model: &str, move_number: usize, count: usize) {
        let starts_run = self.records.last().map_or(true, |last| last.model != model);
        if starts_run {
            log::info!("Inference model is now {} (move {})", model, move_number);
            self.records.push(InferenceRecord {
                model: model.to_string(),
                first_move: move_number,
                last_move: move_number,
                total_count: 0,
            });
        }
        if let Some(last) = self.records.last_mut() {
            last.last_move = move_number;
            last.total_count += count;
        }
    }

    pub fn records(&self) -> &[InferenceRecord] {
        &self.records
    }

    /// Models used while searching move `move_number`, oldest first.
    pub fn models_for_move(&self, move_number: usize) -> Vec<String> {
        let mut models: Vec<String> = self
            .records
            .iter()
            .rev()
            .take_while(|r| r.last_move >= move_number)
            .map(|r| r.model.clone())
            .collect();
        models.reverse();
        models
    }

    /// `"model(first,last), ..."` for every record.
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("{}({},{})", r.model, r.first_move, r.last_move))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
