use chrono::{FixedOffset, Offset, Utc};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;
const HEATMAP_WEEKS: i64 = crate::analysis::heatmap::HEATMAP_WEEKS as i64;

#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub utc_offset_minutes: i32,
    pub discovery_feed_size: usize,
}

impl EffectiveSettings {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn get_settings(data_dir: String) -> Result<Value, String> {
    load_settings_from_disk(&data_dir)
}

#[cfg_attr(feature = "desktop", tauri::command)]
pub async fn save_settings(data_dir: String, settings: Value) -> Result<Value, String> {
    save_settings_to_disk(&data_dir, settings)
}

pub fn load_effective_settings(data_dir: &str) -> Result<EffectiveSettings, String> {
    let settings = load_settings_from_disk(data_dir)?;

    let utc_offset_minutes = settings
        .get("utcOffsetMinutes")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .clamp(-720, 840) as i32;
    let discovery_feed_size = settings
        .get("discoveryFeedSize")
        .and_then(Value::as_u64)
        .unwrap_or(12)
        .clamp(1, 50) as usize;

    Ok(EffectiveSettings {
        utc_offset_minutes,
        discovery_feed_size,
    })
}

pub fn load_settings_from_disk(data_dir: &str) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_app_dir(data_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("settings.json is not valid JSON, using defaults: {e}");
            json!({})
        })
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(data_dir: &str, settings: Value) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_app_dir(data_dir)?;

    let mut merged = load_settings_from_disk(data_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    log::info!("settings saved to {}", path.display());
    Ok(migrated)
}

pub fn app_dir(data_dir: &str) -> PathBuf {
    Path::new(data_dir).join(".thoughtpool")
}

fn settings_path(data_dir: &str) -> PathBuf {
    app_dir(data_dir).join("settings.json")
}

pub fn ensure_app_dir(data_dir: &str) -> Result<(), String> {
    fs::create_dir_all(app_dir(data_dir))
        .map_err(|e| format!("Failed to create .thoughtpool directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    if version > SETTINGS_SCHEMA_VERSION {
        log::warn!("settings.json schema v{version} is newer than this build (v{SETTINGS_SCHEMA_VERSION})");
    }

    // A missing reducedMotion follows the animation switch.
    let animations = out
        .get("animationsEnabled")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    ensure_key(&mut out, "reducedMotion", json!(!animations));

    deep_merge_defaults(&mut out, &defaults);

    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "utcOffsetMinutes": 0,
        "discoveryFeedSize": 12,
        "heatmapWeeks": HEATMAP_WEEKS,
        "colorScheme": "abyss",
        "animationsEnabled": true,
        "reducedMotion": false
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn ensure_key(target: &mut Value, key: &str, value: Value) {
    if let Some(obj) = target.as_object_mut() {
        obj.entry(key.to_string()).or_insert(value);
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_i64(obj, "utcOffsetMinutes", -720, 840, 0);
    clamp_i64(obj, "discoveryFeedSize", 1, 50, 12);
    // The grid layout is fixed; the value is only shown.
    clamp_i64(obj, "heatmapWeeks", HEATMAP_WEEKS, HEATMAP_WEEKS, HEATMAP_WEEKS);

    sanitize_enum(obj, "colorScheme", &["abyss", "reef", "monochrome"], "abyss");

    ensure_bool(obj, "animationsEnabled", true);
    ensure_bool(obj, "reducedMotion", false);
}

fn clamp_i64(map: &mut Map<String, Value>, key: &str, min: i64, max: i64, default: i64) {
    let raw = map.get(key).and_then(Value::as_i64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
