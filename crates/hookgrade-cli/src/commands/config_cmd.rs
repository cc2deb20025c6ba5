//! `hookgrade config` -- display resolved configuration.
//!
//! Prints the resolved configuration as formatted JSON followed by the
//! credential status of each remote endpoint. Key values are never shown.
//!
//! # Examples
//!
//! ```text
//! hookgrade config
//! hookgrade config --config ./hookgrade.json
//! ```

use hookgrade_types::SecretString;
use hookgrade_types::config::Config;

/// Display the resolved configuration and credential status.
pub fn config_show(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }

    println!();
    println!("Credentials:");
    for (endpoint, var) in credential_vars(config) {
        println!("  {endpoint:<10} {var:<24} {}", key_status(var));
    }
}

/// `(endpoint, env var)` for every endpoint that needs a key.
fn credential_vars(config: &Config) -> Vec<(&str, &str)> {
    vec![
        (
            config.backends.secondary.name.as_str(),
            config.backends.secondary.api_key_env.as_str(),
        ),
        ("brief", config.brief.api_key_env.as_str()),
    ]
}

fn key_status(var: &str) -> String {
    match SecretString::from_env(var) {
        Some(key) => format!("set ({key})"),
        None => "missing".into(),
    }
}
