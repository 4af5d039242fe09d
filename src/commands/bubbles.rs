use crate::models::bubble::{Bubble, NewBubble, DEFAULT_TOPIC};
use crate::models::session::SharedState;
use crate::models::stats::ReadDepth;
use chrono::{DateTime, Utc};
use rand::Rng;

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn post_bubble(
    data_dir: String,
    bubble: NewBubble,
    state: tauri::State<'_, SharedState>,
) -> Result<Bubble, String> {
    post_bubble_internal(&data_dir, state.inner(), bubble, Utc::now(), &mut rand::thread_rng())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn list_bubbles(
    data_dir: String,
    owner_only: bool,
    state: tauri::State<'_, SharedState>,
) -> Result<Vec<Bubble>, String> {
    list_bubbles_internal(&data_dir, state.inner(), owner_only)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_discovery_feed(
    data_dir: String,
    limit: Option<usize>,
    state: tauri::State<'_, SharedState>,
) -> Result<Vec<Bubble>, String> {
    get_discovery_feed_internal(&data_dir, state.inner(), limit, &mut rand::thread_rng())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn record_read(
    data_dir: String,
    depth: String,
    state: tauri::State<'_, SharedState>,
) -> Result<(), String> {
    record_read_internal(&data_dir, state.inner(), &depth, Utc::now())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn record_save(data_dir: String, state: tauri::State<'_, SharedState>) -> Result<(), String> {
    record_save_internal(&data_dir, state.inner(), Utc::now())
}

pub fn post_bubble_internal<R: Rng + ?Sized>(
    data_dir: &str,
    state: &SharedState,
    input: NewBubble,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Bubble, String> {
    let owner_id = current_user(state)?;
    let input = input.validate()?;

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;

    if let Some(parent_id) = input.parent_id.as_deref() {
        let exists = crate::commands::db::bubble_exists(&conn, parent_id)
            .map_err(|e| format!("DB read error: {e}"))?;
        if !exists {
            return Err(format!("PARENT_NOT_FOUND: No bubble with id {parent_id}"));
        }
    }

    let bubble = Bubble {
        id: uuid::Uuid::new_v4().to_string(),
        content: input.content,
        title: input.title,
        parent_id: input.parent_id,
        topic: input.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        owner_id,
        created_at: now,
        pos_x: rng.gen_range(0.0..100.0),
        pos_y: rng.gen_range(0.0..100.0),
    };

    crate::commands::db::insert_bubble(&conn, &bubble)
        .map_err(|e| format!("Insert error: {e}"))?;

    state
        .lock()
        .map_err(|_| "State lock error".to_string())?
        .set_unlocked_for(&bubble.owner_id, true);

    log::info!(
        "posted {} {} ({} words)",
        if bubble.is_reply() { "reply" } else { "bubble" },
        bubble.id,
        crate::analysis::activity::word_count(&bubble.content)
    );

    Ok(bubble)
}

/// Shared feed, or only the signed-in user's own bubbles for the private view.
pub fn list_bubbles_internal(
    data_dir: &str,
    state: &SharedState,
    owner_only: bool,
) -> Result<Vec<Bubble>, String> {
    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;

    let bubbles = if owner_only {
        let owner_id = current_user(state)?;
        crate::commands::db::load_bubbles_by_owner(&conn, &owner_id)
    } else {
        crate::commands::db::load_bubbles(&conn)
    };

    bubbles.map_err(|e| format!("DB read error: {e}"))
}

pub fn get_discovery_feed_internal<R: Rng + ?Sized>(
    data_dir: &str,
    state: &SharedState,
    limit: Option<usize>,
    rng: &mut R,
) -> Result<Vec<Bubble>, String> {
    let settings = crate::commands::settings::load_effective_settings(data_dir)?;
    let viewer = state
        .lock()
        .map_err(|_| "State lock error".to_string())?
        .session()
        .map(|s| s.user_id.clone());

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;
    let bubbles = crate::commands::db::load_bubbles(&conn)
        .map_err(|e| format!("DB read error: {e}"))?;

    Ok(crate::analysis::feed::discovery_feed(
        &bubbles,
        viewer.as_deref(),
        limit.unwrap_or(settings.discovery_feed_size),
        rng,
    ))
}

pub fn record_read_internal(
    data_dir: &str,
    state: &SharedState,
    depth: &str,
    now: DateTime<Utc>,
) -> Result<(), String> {
    let depth = ReadDepth::parse(depth)?;
    let (owner_id, date) = owner_and_local_date(data_dir, state, now)?;

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;
    crate::commands::db::increment_read(&conn, &owner_id, &date, depth)
        .map_err(|e| format!("DB upsert error: {e}"))
}

pub fn record_save_internal(data_dir: &str, state: &SharedState, now: DateTime<Utc>) -> Result<(), String> {
    let (owner_id, date) = owner_and_local_date(data_dir, state, now)?;

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;
    crate::commands::db::increment_saved(&conn, &owner_id, &date)
        .map_err(|e| format!("DB upsert error: {e}"))
}

fn current_user(state: &SharedState) -> Result<String, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.user_id().map(str::to_string)
}

fn owner_and_local_date(
    data_dir: &str,
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<(String, String), String> {
    let owner_id = current_user(state)?;
    let settings = crate::commands::settings::load_effective_settings(data_dir)?;
    let date = crate::analysis::activity::local_date(now, settings.offset())
        .format("%Y-%m-%d")
        .to_string();
    Ok((owner_id, date))
}
