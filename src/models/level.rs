use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    pub name: String,
    pub min_xp: u64,
    pub visual_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLevel {
    pub current_xp: u64,
    pub level_name: String,
    pub visual_scale: f64,
    pub next_level_name: Option<String>, // None at the max tier
    pub next_level_xp: Option<u64>,
    pub progress_percent: f64,
}

/// Evolution tiers, ascending by `min_xp`.
pub fn default_tiers() -> Vec<LevelTier> {
    [
        ("Plankton", 0, 0.6),
        ("Shrimp", 200, 0.75),
        ("Jellyfish", 800, 0.9),
        ("Octopus", 2000, 1.05),
        ("Dolphin", 5000, 1.25),
        ("Whale", 12000, 1.5),
    ]
    .into_iter()
    .map(|(name, min_xp, visual_scale)| LevelTier {
        name: name.to_string(),
        min_xp,
        visual_scale,
    })
    .collect()
}
