/// Config file loading and creation for the rankboard CLI.
///
/// Config lives at ~/.config/rankboard/config.toml.
/// Every field is optional. CLI args override config values and missing
/// engine parameters fall back to the engine defaults.
use rankboard_core::RankingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct RankboardConfig {
    /// Default probability of drawing a similar-rating pair in `next-pair`.
    pub adaptive_ratio: Option<f64>,
    /// Log level for rankboard targets when RUST_LOG is unset.
    pub log_level: Option<String>,
    /// Engine parameters: [elo], [elo.adaptive], [strength], [selector], [leaderboard].
    #[serde(flatten)]
    pub engine: RankingConfig,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# rankboard configuration
# All values here can be overridden by CLI flags. Anything left out uses
# the built-in default shown in the comment.

# Probability of picking a similarly rated pair in next-pair (0.0 - 1.0)
# adaptive_ratio = 0.7

# Log level for rankboard output when RUST_LOG is not set
# log_level = \"info\"

[elo]
# default_rating = 1500.0
# K used when replaying the whole log
# default_k = 32.0

[elo.adaptive]
# provisional_k = 40.0
# provisional_below = 10
# standard_k = 32.0
# established_from = 30
# established_k = 24.0

[strength]
# floor = 1e-8
# tolerance = 1e-6
# max_iterations = 1000

[selector]
# max_challenge_share = 0.15
# min_fairness_sample = 20
# similarity_slice = 10
# min_adaptive_pool = 10

[leaderboard]
# neighbors_above = 3
# neighbors_below = 2
";

/// Returns the default config path: ~/.config/rankboard/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("rankboard").join("config.toml")
}

/// Parse config file contents.
pub fn parse_config(content: &str) -> Result<RankboardConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> RankboardConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => RankboardConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let cfg = parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(cfg.engine, RankingConfig::default());
        assert!(cfg.adaptive_ratio.is_none());
    }

    #[test]
    fn test_partial_overrides() {
        let cfg = parse_config(
            "adaptive_ratio = 0.4\n\n[elo.adaptive]\nprovisional_k = 48.0\n\n[selector]\nmin_fairness_sample = 5\n",
        )
        .unwrap();

        assert_eq!(cfg.adaptive_ratio, Some(0.4));
        assert_eq!(cfg.engine.elo.adaptive.provisional_k, 48.0);
        assert_eq!(cfg.engine.elo.adaptive.standard_k, 32.0);
        assert_eq!(cfg.engine.elo.default_rating, 1500.0);
        assert_eq!(cfg.engine.selector.min_fairness_sample, 5);
        assert_eq!(cfg.engine.selector.max_challenge_share, 0.15);
    }

    #[test]
    fn test_empty_file() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.engine, RankingConfig::default());
    }
}
