//! Snapshot persistence and configuration override files. Both formats are
//! human-readable JSON; a failed load reports the error and leaves whatever
//! state the caller holds untouched.

use std::fs;

use chesspong_core::{GameConfig, Snapshot};

/// Write a snapshot as pretty-printed JSON.
pub fn save_snapshot(path: &str, snapshot: &Snapshot) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a snapshot back. Shape validation against the live board happens in
/// `Game::apply_snapshot`, not here.
pub fn load_snapshot(path: &str) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Default save filename, stamped so repeated saves do not clobber each
/// other.
pub fn default_save_path() -> String {
    format!("chesspong-state_{}.json", chrono::Utc::now().timestamp())
}

/// Build a match configuration from a flat JSON object of overrides, e.g.
/// `{"ball_speed": 5, "board_width": 6}`. Non-numeric values are ignored
/// and out-of-range numbers clamp, per the config schema.
pub fn load_config(path: &str) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)?;
    let overrides = map
        .iter()
        .filter_map(|(key, value)| value.as_i64().map(|n| (key.as_str(), n)));
    Ok(GameConfig::from_overrides(overrides))
}
