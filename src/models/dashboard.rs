use crate::models::chart::{CompositionChart, Heatmap};
use crate::models::level::UserLevel;
use crate::models::stats::{DailyStats, WeeklyWaveData};
use serde::{Deserialize, Serialize};

/// Everything the sonar, heatmap and radial views render for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub date: String,
    pub stats: DailyStats,
    pub daily_xp: u32,
    pub pressure: u32,
    pub pressure_gauge: f64, // pressure clamped to 0–100 for the dial
    pub lung_capacity: f64,
    pub level: UserLevel,
    pub streak_milestone: bool,
    pub heatmap: Heatmap,
    pub composition: CompositionChart,
    pub weekly: WeeklyWaveData,
}
