pub mod analysis;
pub mod commands;
pub mod models;

#[cfg(feature = "desktop")]
use commands::{
    bubbles::{get_discovery_feed, list_bubbles, post_bubble, record_read, record_save},
    scoring::{get_dashboard, get_level, get_level_tiers},
    session::{clear_session, get_app_state, refresh_unlock, select_view, set_session},
    settings::{get_settings, save_settings},
};
#[cfg(feature = "desktop")]
use models::session::SharedState;

/// `RUST_LOG` overrides the default `info` filter. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_logging();
    log::info!("starting thoughtpool {}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(SharedState::default())
        .invoke_handler(tauri::generate_handler![
            set_session,
            clear_session,
            get_app_state,
            select_view,
            refresh_unlock,
            post_bubble,
            list_bubbles,
            get_discovery_feed,
            record_read,
            record_save,
            get_dashboard,
            get_level,
            get_level_tiers,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
