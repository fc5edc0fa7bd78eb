use std::env;
use std::fs;
use std::path::Path;

use bookbot_core::config::{detect_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let catalog_path = config
        .catalog
        .path
        .as_deref()
        .map_or_else(|| "<embedded>".to_string(), |path| path.display().to_string());

    [
        "effective config (source precedence: env > file > default):".to_string(),
        render_line(
            "server.bind_address",
            &config.server.bind_address,
            source("server.bind_address", &["BOOKBOT_SERVER_BIND_ADDRESS"]),
        ),
        render_line(
            "server.port",
            &config.server.port.to_string(),
            source("server.port", &["BOOKBOT_SERVER_PORT", "PORT"]),
        ),
        render_line(
            "server.graceful_shutdown_secs",
            &config.server.graceful_shutdown_secs.to_string(),
            source("server.graceful_shutdown_secs", &["BOOKBOT_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source("logging.level", &["BOOKBOT_LOGGING_LEVEL", "BOOKBOT_LOG_LEVEL"]),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source("logging.format", &["BOOKBOT_LOGGING_FORMAT", "BOOKBOT_LOG_FORMAT"]),
        ),
        render_line("catalog.path", &catalog_path, source("catalog.path", &["BOOKBOT_CATALOG_PATH"])),
    ]
    .join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

/// First env key that is set wins, in the order given.
fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_paths_are_found_in_the_file_document() {
        let doc: Value = "[server]\nport = 8080\n".parse().expect("toml");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn file_source_names_the_file() {
        let doc: Value = "[catalog]\npath = \"books.toml\"\n".parse().expect("toml");

        let source = field_source(
            "catalog.path",
            &["BOOKBOT_TEST_UNSET_CATALOG_PATH"],
            Some(&doc),
            Some(Path::new("bookbot.toml")),
        );
        assert_eq!(source, "file (bookbot.toml)");
        assert_eq!(
            field_source("server.port", &["BOOKBOT_TEST_UNSET_PORT"], Some(&doc), None),
            "default"
        );
    }
}
