use crate::models::stats::DailyStats;

/// Words per day that count as a full breath.
pub const DAILY_WORD_TARGET: f64 = 300.0;

pub const TASK_COMPLETE_XP: u32 = 100;
pub const STREAK_BONUS_PER_DAY: u32 = 10;
pub const MAX_STREAK_BONUS: u32 = 300;

/// Total XP earned for one day.
pub fn calculate_daily_xp(stats: &DailyStats) -> u32 {
    let mut xp = 0u32;

    if stats.is_task_complete {
        xp = xp.saturating_add(TASK_COMPLETE_XP);
    }

    xp = xp.saturating_add(streak_bonus(stats.streak));
    xp = xp
        .saturating_add(stats.original_words)
        .saturating_add(stats.reply_words);

    xp.saturating_add(reading_xp(stats))
}

/// `min((streak - 1) * 10, 300)`, zero for streaks of one day or less.
pub fn streak_bonus(streak: u32) -> u32 {
    if streak <= 1 {
        return 0;
    }
    (streak - 1)
        .saturating_mul(STREAK_BONUS_PER_DAY)
        .min(MAX_STREAK_BONUS)
}

fn reading_xp(stats: &DailyStats) -> u32 {
    stats
        .read_deep
        .saturating_mul(50)
        .saturating_add(stats.read_medium.saturating_mul(15))
        .saturating_add(stats.read_shallow.saturating_mul(5))
}

/// Reading intensity. Callers clamp for display.
pub fn calculate_pressure(stats: &DailyStats) -> u32 {
    stats
        .read_shallow
        .saturating_add(stats.read_medium.saturating_mul(5))
        .saturating_add(stats.read_deep.saturating_mul(20))
}

/// Percentage of the daily word target, capped at 150 so the gauge can overflow.
pub fn calculate_lung_capacity(stats: &DailyStats) -> f64 {
    let volume = stats.original_words as f64 * 1.5 + stats.reply_words as f64;
    (volume / DAILY_WORD_TARGET * 100.0).min(150.0)
}
