use log::Level;
use std::env;
use std::str::FromStr;

const LOG_STREAM_NAME: &str = "AWS_LAMBDA_LOG_STREAM_NAME";
const REGION: &str = "AWS_REGION";
const DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const LOG_LEVEL: &str = "LOG_LEVEL";

/// Configuration injected by the Lambda environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_stream_name: String,
    pub default_region: Option<String>,
    pub log_level: Level,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Settings {
            log_stream_name: lookup(LOG_STREAM_NAME).unwrap_or_default(),
            default_region: lookup(REGION).or_else(|| lookup(DEFAULT_REGION)),
            log_level: lookup(LOG_LEVEL)
                .and_then(|level| Level::from_str(&level).ok())
                .unwrap_or(Level::Info),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::Settings;
    use log::Level;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup() {
        let mut vars = HashMap::new();
        vars.insert("AWS_LAMBDA_LOG_STREAM_NAME", "2017/04/20/[$LATEST]abcdef");
        vars.insert("AWS_DEFAULT_REGION", "eu-central-1");
        vars.insert("LOG_LEVEL", "debug");

        let settings = Settings::from_lookup(|key| vars.get(key).map(|value| value.to_string()));
        assert_eq!(
            settings,
            Settings {
                log_stream_name: "2017/04/20/[$LATEST]abcdef".to_string(),
                default_region: Some("eu-central-1".to_string()),
                log_level: Level::Debug,
            }
        );
    }

    #[test]
    fn test_from_lookup_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(
            settings,
            Settings {
                log_stream_name: String::new(),
                default_region: None,
                log_level: Level::Info,
            }
        );
    }
}
