use std::fs;

use shop_finance_core::EngineConfig;
use tracing::debug;

use crate::input;

/// Load engine settings from a YAML file when `--config` is given.
///
/// `None` means "keep whatever settings the input document carries".
pub fn load(path: Option<&str>) -> Result<Option<EngineConfig>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let canonical = input::file::resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let config = parse(&contents)
        .map_err(|e| format!("Invalid config '{}': {}", canonical.display(), e))?;
    debug!(path = %canonical.display(), "loaded engine config");
    Ok(Some(config))
}

fn parse(contents: &str) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    // an empty file deserialises to null
    let config: EngineConfig = if contents.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_yaml::from_str(contents)?
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = parse("forecast:\n  growth_window: 3\n").unwrap();
        assert_eq!(config.forecast.growth_window, 3);
        assert_eq!(config.forecast.max_confidence, dec!(0.95));
        assert_eq!(config.ratios.receivables_turnover, dec!(12));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_inconsistent_yaml_rejected() {
        let err = parse("forecast:\n  growth_window: 0\n").unwrap_err();
        assert!(err.to_string().contains("growth_window"));
    }
}
