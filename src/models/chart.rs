use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatIntensity {
    Empty,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: String,
    pub xp: u32,
    pub max_depth: u32,
    pub intensity: HeatIntensity,
    pub is_pulsing: bool,
}

/// Activity grid: one column per week, oldest first, seven cells each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub weeks: Vec<Vec<HeatmapCell>>,
    pub total_xp: u64,
    pub active_days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub label: String, // "original" | "reply"
    pub share: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionChart {
    pub original_words: u32,
    pub reply_words: u32,
    pub segments: Vec<ArcSegment>,
}
