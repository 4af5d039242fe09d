use serde::{Deserialize, Serialize};

/// Activity counters for a single day of the signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub original_words: u32,
    pub reply_words: u32,
    pub read_shallow: u32,
    pub read_medium: u32,
    pub read_deep: u32,
    pub resonance: u32,
    pub saved: u32,
    pub streak: u32,
    pub is_task_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyXp {
    pub date: String, // YYYY-MM-DD
    pub xp: u32,
    pub max_depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTopic {
    pub topic: String,
    pub count: u32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyWaveData {
    pub topics: Vec<WeeklyTopic>,
    pub my_bubbles: u32,
    pub responses: u32,
    pub resonance: u32,
}

/// Locally recorded reading counters for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingDay {
    pub date: String, // YYYY-MM-DD
    pub shallow: u32,
    pub medium: u32,
    pub deep: u32,
    pub saved: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadDepth {
    Shallow,
    Medium,
    Deep,
}

impl ReadDepth {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "shallow" => Ok(Self::Shallow),
            "medium" => Ok(Self::Medium),
            "deep" => Ok(Self::Deep),
            other => Err(format!("INVALID_DEPTH: Unknown read depth '{other}'")),
        }
    }
}
