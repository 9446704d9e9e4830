use serde::{Deserialize, Serialize};

pub const TOTAL_STAGES: u8 = 2;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum TaskStatus {
    Progress { stage: u8, percent: u8, overall: u8 },
    Message(String),
}

impl TaskStatus {
    /// Progress within `stage` (1-based), folded into an overall percentage.
    pub fn progress(stage: u8, percent: f64) -> Self {
        let percent = percent.clamp(0.0, 100.0);
        let overall = ((stage.saturating_sub(1)) as f64 + percent / 100.0) / TOTAL_STAGES as f64 * 100.0;
        TaskStatus::Progress {
            stage,
            percent: percent as u8,
            overall: overall as u8,
        }
    }
}
