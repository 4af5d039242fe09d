use crate::models::session::{AppState, Session, SharedState, View};
use chrono::{DateTime, Utc};

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn set_session(
    data_dir: String,
    session: Session,
    state: tauri::State<'_, SharedState>,
) -> Result<AppState, String> {
    set_session_internal(&data_dir, state.inner(), session, Utc::now())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn clear_session(state: tauri::State<'_, SharedState>) -> Result<AppState, String> {
    clear_session_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_app_state(state: tauri::State<'_, SharedState>) -> Result<AppState, String> {
    get_app_state_internal(state.inner())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn select_view(view: String, state: tauri::State<'_, SharedState>) -> Result<AppState, String> {
    select_view_internal(state.inner(), &view)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn refresh_unlock(
    data_dir: String,
    state: tauri::State<'_, SharedState>,
) -> Result<bool, String> {
    refresh_unlock_internal(&data_dir, state.inner(), Utc::now())
}

pub fn set_session_internal(
    data_dir: &str,
    state: &SharedState,
    session: Session,
    now: DateTime<Utc>,
) -> Result<AppState, String> {
    if session.user_id.trim().is_empty() {
        return Err("INVALID_SESSION: session has no user id".to_string());
    }

    // Nothing is stored until the unlock check has succeeded.
    let unlocked = posted_today(data_dir, &session.user_id, now)?;

    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    log::info!("session started for {}", session.user_id);
    lock.set_session(session);
    lock.set_unlocked(unlocked);
    Ok(lock.clone())
}

pub fn clear_session_internal(state: &SharedState) -> Result<AppState, String> {
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.clear_session();
    Ok(lock.clone())
}

pub fn get_app_state_internal(state: &SharedState) -> Result<AppState, String> {
    let lock = state.lock().map_err(|_| "State lock error".to_string())?;
    Ok(lock.clone())
}

pub fn select_view_internal(state: &SharedState, view: &str) -> Result<AppState, String> {
    let view = View::parse(view)?;
    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    lock.select_view(view)?;
    Ok(lock.clone())
}

/// Re-checks whether the signed-in user has posted since local midnight.
pub fn refresh_unlock_internal(
    data_dir: &str,
    state: &SharedState,
    now: DateTime<Utc>,
) -> Result<bool, String> {
    let user_id = {
        let lock = state.lock().map_err(|_| "State lock error".to_string())?;
        lock.user_id()?.to_string()
    };

    let unlocked = posted_today(data_dir, &user_id, now)?;

    let mut lock = state.lock().map_err(|_| "State lock error".to_string())?;
    if !lock.set_unlocked_for(&user_id, unlocked) {
        log::debug!("session changed during unlock check for {user_id}");
        return Ok(lock.is_unlocked());
    }
    log::debug!("unlock for {user_id}: {unlocked}");
    Ok(unlocked)
}

fn posted_today(data_dir: &str, user_id: &str, now: DateTime<Utc>) -> Result<bool, String> {
    let settings = crate::commands::settings::load_effective_settings(data_dir)?;
    let midnight = crate::analysis::activity::local_midnight_utc(now, settings.offset());

    let conn = crate::commands::db::get_db_connection(data_dir)
        .map_err(|e| format!("DB error: {e}"))?;
    crate::commands::db::has_posted_since(&conn, user_id, midnight)
        .map_err(|e| format!("DB read error: {e}"))
}
