// ⚙️ Runtime configuration
//
// Resolution order (later wins):
//   1. Defaults
//   2. Environment: SPELLBOOK_ARCHIVE_LOG_LEVEL, SPELLBOOK_ARCHIVE_COLLECTION,
//      SPELLBOOK_ARCHIVE_JOURNAL
//   3. Flags: --log-level <level>, --collection <csv>, --journal <json>

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "SPELLBOOK_ARCHIVE_LOG_LEVEL";
pub const ENV_COLLECTION: &str = "SPELLBOOK_ARCHIVE_COLLECTION";
pub const ENV_JOURNAL: &str = "SPELLBOOK_ARCHIVE_JOURNAL";

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// tracing filter directive (logs go to stderr)
    pub log_level: String,

    /// CSV collection to load before the first prompt
    pub collection: Option<PathBuf>,

    /// Where to write the event journal (JSON) on exit
    pub journal: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            collection: None,
            journal: None,
        }
    }
}

impl ArchiveConfig {
    /// Load from the process environment and command line
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    /// Resolve from an arbitrary environment lookup and argument list
    pub fn resolve<E, A>(env: E, args: A) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
        A: IntoIterator<Item = String>,
    {
        let mut config = ArchiveConfig::default();

        if let Some(level) = env(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(path) = env(ENV_COLLECTION).filter(|v| !v.trim().is_empty()) {
            config.collection = Some(PathBuf::from(path));
        }
        if let Some(path) = env(ENV_JOURNAL).filter(|v| !v.trim().is_empty()) {
            config.journal = Some(PathBuf::from(path));
        }

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .with_context(|| format!("missing value for {}", flag))
            };
            match flag.as_str() {
                "--log-level" => config.log_level = value()?,
                "--collection" => config.collection = Some(PathBuf::from(value()?)),
                "--journal" => config.journal = Some(PathBuf::from(value()?)),
                other => bail!("unknown argument: {}", other),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ArchiveConfig::resolve(|_| None, Vec::new()).unwrap();
        assert_eq!(config, ArchiveConfig::default());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            (ENV_LOG_LEVEL, "debug"),
            (ENV_COLLECTION, "books.csv"),
            (ENV_JOURNAL, "   "),
        ]
        .into_iter()
        .collect();

        let config =
            ArchiveConfig::resolve(|k| env.get(k).map(|v| v.to_string()), Vec::new()).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.collection, Some(PathBuf::from("books.csv")));
        // Blank values are ignored
        assert_eq!(config.journal, None);
    }

    #[test]
    fn test_flags_override_env() {
        let config = ArchiveConfig::resolve(
            |k| (k == ENV_LOG_LEVEL).then(|| "debug".to_string()),
            args(&["--log-level", "trace", "--journal", "events.json"]),
        )
        .unwrap();

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.journal, Some(PathBuf::from("events.json")));
    }

    #[test]
    fn test_bad_arguments() {
        let missing = ArchiveConfig::resolve(|_| None, args(&["--collection"]));
        assert!(missing.unwrap_err().to_string().contains("missing value for --collection"));

        let unknown = ArchiveConfig::resolve(|_| None, args(&["--verbose"]));
        assert!(unknown.unwrap_err().to_string().contains("unknown argument"));
    }
}
