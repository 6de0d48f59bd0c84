use crate::types::*;
use chrono::Local;
use std::{
    env,
    fs,
    io::Write,
    path::PathBuf,
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn resolve_repo_path(raw: &str) -> PathBuf {
  let path = PathBuf::from(raw);
  if path.is_absolute() {
    path
  } else {
    repo_root().join(path)
  }
}

pub fn config_path() -> PathBuf {
  match env_default("DRIFT_CONFIG_PATH") {
    Some(raw) => resolve_repo_path(&raw),
    None => repo_root().join("config.json"),
  }
}

pub fn env_default(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

pub fn env_flag_true_default(key: &str, default: bool) -> bool {
  match env::var(key) {
    Ok(value) => {
      let value = value.trim().to_ascii_lowercase();
      matches!(value.as_str(), "1" | "true" | "yes" | "on")
    }
    Err(_) => default,
  }
}

pub fn apply_env_defaults(mut config: AppConfig) -> AppConfig {
  if config.overlay_addr.trim().is_empty() {
    if let Some(value) = env_default("DRIFT_OVERLAY_ADDR") {
      config.overlay_addr = value;
    }
  }
  if config.overlay_dir.trim().is_empty() {
    if let Some(value) = env_default("DRIFT_OVERLAY_DIR") {
      config.overlay_dir = value;
    }
  }
  if config.log_dir.trim().is_empty() {
    config.log_dir = env_default("DRIFT_LOG_DIR").unwrap_or_else(|| AppConfig::default().log_dir);
  }
  config.strict_results = env_flag_true_default("DRIFT_STRICT_RESULTS", config.strict_results);
  config
}

pub fn parse_config(data: &str) -> Result<AppConfig, String> {
  serde_json::from_str::<AppConfig>(data).map_err(|e| e.to_string())
}

pub fn load_config_inner() -> Result<AppConfig, String> {
  let path = config_path();
  if !path.is_file() {
    return Ok(apply_env_defaults(AppConfig::default()));
  }
  let data = fs::read_to_string(&path).map_err(|e| format!("read config {}: {e}", path.display()))?;
  let config = parse_config(&data).map_err(|e| format!("parse config {}: {e}", path.display()))?;
  Ok(apply_env_defaults(config))
}

pub fn load_env_file() {
  let env_path = repo_root().join(".env");
  if !env_path.is_file() {
    return;
  }
  let contents = match fs::read_to_string(&env_path) {
    Ok(data) => data,
    Err(_) => return,
  };
  for line in contents.lines() {
    if let Some((key, value)) = parse_env_line(line) {
      if env::var_os(&key).is_none() {
        env::set_var(key, value);
      }
    }
  }
}

pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let trimmed = line.trim();
  if trimmed.is_empty() || trimmed.starts_with('#') {
    return None;
  }
  let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
  let (key, raw_value) = trimmed.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  let mut value = raw_value.trim();
  if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if let Some(idx) = value.find('#') {
    value = value[..idx].trim_end();
  }
  Some((key.to_string(), value.to_string()))
}

pub fn logs_dir(config: &AppConfig) -> PathBuf {
  resolve_repo_path(config.log_dir.trim())
}

pub fn results_log_path(config: &AppConfig) -> PathBuf {
  logs_dir(config).join("results.log")
}

/// Best-effort append to the results log. Failures are dropped so a
/// read-only disk never blocks recording a winner.
pub fn append_results_log(config: &AppConfig, label: &str, payload: &str) {
  if !config.results_log {
    return;
  }
  let dir = logs_dir(config);
  if fs::create_dir_all(&dir).is_err() {
    return;
  }
  let path = results_log_path(config);
  let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
  let entry = format!("[{timestamp}] {label} {payload}\n");
  if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
    let _ = file.write_all(entry.as_bytes());
  }
}

pub fn log_config_summary(config: &AppConfig) {
  if config.strict_results {
    tracing::info!("strict results enabled: winners must be a current participant");
  } else {
    tracing::info!("permissive results: any recorded winner overwrites its slot");
  }
  if config.overlay_addr.trim().is_empty() {
    tracing::info!("overlay server disabled (set DRIFT_OVERLAY_ADDR to enable)");
  }
  if !config.overlay_dir.trim().is_empty() && !resolve_repo_path(config.overlay_dir.trim()).is_dir() {
    tracing::warn!("overlay dir {} does not exist; only /state.json will be served", config.overlay_dir);
  }
}
