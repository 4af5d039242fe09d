use crate::analysis::{activity, geometry, heatmap, level, xp};
use crate::models::bubble::Bubble;
use crate::models::dashboard::Dashboard;
use crate::models::level::{default_tiers, LevelTier, UserLevel};
use crate::models::session::SharedState;
use crate::models::stats::{DailyXp, ReadingDay};
use chrono::{DateTime, FixedOffset, Utc};

const CHART_CENTER: f64 = 100.0;
const CHART_RADIUS: f64 = 80.0;

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_dashboard(
    data_dir: String,
    state: tauri::State<'_, SharedState>,
) -> Result<Dashboard, String> {
    get_dashboard_internal(&data_dir, state.inner(), Utc::now())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_level(
    data_dir: String,
    state: tauri::State<'_, SharedState>,
) -> Result<UserLevel, String> {
    get_level_internal(&data_dir, state.inner(), Utc::now())
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn get_level_tiers() -> Result<Vec<LevelTier>, String> {
    Ok(default_tiers())
}

struct OwnerActivity {
    owner_id: String,
    offset: FixedOffset,
    bubbles: Vec<Bubble>,
    reading: Vec<ReadingDay>,
}

fn load_owner_activity(data_dir: &str, state: &SharedState) -> Result<OwnerActivity, String> {
    let owner_id = {
        let lock = state.lock().map_err(|_| "State lock error".to_string())?;
        lock.user_id()?.to_string()
    };
    let settings = crate::commands::settings::load_effective_settings(data_dir)?;

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;
    let bubbles = crate::commands::db::load_bubbles(&conn)
        .map_err(|e| format!("DB read error: {e}"))?;
    let reading = crate::commands::db::load_reading_log(&conn, &owner_id)
        .map_err(|e| format!("DB read error: {e}"))?;

    Ok(OwnerActivity {
        owner_id,
        offset: settings.offset(),
        bubbles,
        reading,
    })
}

pub fn get_dashboard_internal(
    data_dir: &str,
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<Dashboard, String> {
    let data = load_owner_activity(data_dir, state)?;

    let dashboard = build_dashboard(
        &data.bubbles,
        &data.reading,
        &data.owner_id,
        now,
        data.offset,
        &default_tiers(),
    );
    log::debug!(
        "dashboard for {}: {} XP today, level {}",
        data.owner_id,
        dashboard.daily_xp,
        dashboard.level.level_name
    );
    Ok(dashboard)
}

/// Level only; skips the charts the dashboard also lays out.
pub fn get_level_internal(
    data_dir: &str,
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<UserLevel, String> {
    let data = load_owner_activity(data_dir, state)?;
    let today = activity::local_date(now, data.offset);
    let history = activity::daily_xp_history(
        &data.bubbles,
        &data.owner_id,
        &data.reading,
        today,
        data.offset,
    );
    Ok(level::resolve_level(activity::cumulative_xp(&history), &default_tiers()))
}

/// Pure assembly of every derived value for `owner` on the local day of `now`.
pub fn build_dashboard(
    bubbles: &[Bubble],
    reading: &[ReadingDay],
    owner: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
    tiers: &[LevelTier],
) -> Dashboard {
    let today = activity::local_date(now, offset);
    let date = today.format("%Y-%m-%d").to_string();

    let today_reading = reading.iter().find(|r| r.date == date);
    let stats = activity::daily_stats_for(bubbles, owner, today, today_reading, offset);

    let history: Vec<DailyXp> = activity::daily_xp_history(bubbles, owner, reading, today, offset);
    let total_xp = activity::cumulative_xp(&history);

    let pressure = xp::calculate_pressure(&stats);

    Dashboard {
        date,
        daily_xp: xp::calculate_daily_xp(&stats),
        pressure,
        pressure_gauge: (pressure as f64).clamp(0.0, 100.0),
        lung_capacity: xp::calculate_lung_capacity(&stats),
        level: level::resolve_level(total_xp, tiers),
        streak_milestone: level::is_streak_milestone(stats.streak),
        heatmap: heatmap::build_heatmap(&history, today),
        composition: geometry::composition_chart(
            stats.original_words,
            stats.reply_words,
            CHART_CENTER,
            CHART_CENTER,
            CHART_RADIUS,
        ),
        weekly: activity::weekly_wave(bubbles, owner, today, offset),
        stats,
    }
}
