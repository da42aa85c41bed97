use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

/// Layered configuration: built-in defaults, then `.nesyrc`, then environment.
#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Environment takes precedence over the rc file
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    /// Defaults only, ignoring rc file and environment.
    pub fn defaults() -> Self {
        Self { inner: default_map() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.parse::<f32>().ok())
    }

    pub fn program_dir(&self) -> PathBuf {
        self.get("PROGRAM_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_DIR))
    }

    pub fn model(&self) -> String {
        self.get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

pub const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";
pub const DEFAULT_PROGRAM_DIR: &str = "prolog_programs";

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "API_BASE_URL",
        "API_KEY",
        "DEFAULT_MODEL",
        "REQUEST_TIMEOUT",
        "TEMPERATURE",
        "PROGRAM_DIR",
        "SWIPL_PATH",
        "SOLUTION_GOAL",
        "SOLUTION_VARIABLE",
        "MIN_PROGRAM_LENGTH",
        "MAX_ANSWERS",
        "PRETTIFY_MARKDOWN",
        "LOG_LEVEL",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("nesy").join(".nesyrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Services
    m.insert("API_BASE_URL".into(), "http://localhost:11434".into());
    m.insert("DEFAULT_MODEL".into(), DEFAULT_MODEL.into());
    m.insert("SWIPL_PATH".into(), "swipl".into());

    // Numbers
    m.insert("REQUEST_TIMEOUT".into(), "120".into());
    m.insert("TEMPERATURE".into(), "0.0".into());
    m.insert("MIN_PROGRAM_LENGTH".into(), "20".into());
    m.insert("MAX_ANSWERS".into(), "10".into());

    // Program storage and query
    m.insert("PROGRAM_DIR".into(), DEFAULT_PROGRAM_DIR.into());
    m.insert("SOLUTION_GOAL".into(), "solve(Solution)".into());
    m.insert("SOLUTION_VARIABLE".into(), "Solution".into());

    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());
    m.insert("LOG_LEVEL".into(), "warn".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_keys_come_from_the_environment() {
        assert!(is_config_key("SWIPL_PATH"));
        assert!(is_config_key("MAX_ANSWERS"));
        assert!(!is_config_key("NESY_DEBUG"));
        assert!(!is_config_key("PATH"));
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".nesyrc");
        fs::write(&rc, "# local\nMAX_ANSWERS = 3\n\nnot a setting\n").unwrap();

        let cfg = Config::load_from(&rc);
        assert_eq!(cfg.get_usize("MAX_ANSWERS"), Some(3));
        assert_eq!(cfg.get("SOLUTION_GOAL").as_deref(), Some("solve(Solution)"));
    }

    #[test]
    fn missing_rc_file_keeps_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/nesy/.nesyrc"));
        assert_eq!(cfg.get_usize("MIN_PROGRAM_LENGTH"), Some(20));
        assert!(cfg.get_bool("PRETTIFY_MARKDOWN"));
    }
}
