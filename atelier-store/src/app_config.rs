use atelier_order::coordinator::CheckoutRules;
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub business_rules: BusinessRules,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    pub tax_rate: f64,
    pub shipping_fee_cents: i64,
    pub free_shipping_threshold_cents: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub default_low_stock_threshold: i32,
}

fn default_low_stock_threshold() -> i32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub from_address: String,
    #[serde(default)]
    pub enabled: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// `dir` holds `default.toml` plus the optional per-environment and
    /// local override files.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::from(dir.join("default")))
            // Layer the current environment file on top (optional)
            .add_source(config::File::from(dir.join(&run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::from(dir.join("local")).required(false))
            // Environment variables with the ATELIER prefix,
            // e.g. ATELIER_BUSINESS_RULES__TAX_RATE=0.2
            .add_source(config::Environment::with_prefix("ATELIER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl From<&BusinessRules> for CheckoutRules {
    fn from(rules: &BusinessRules) -> Self {
        Self {
            tax_rate: rules.tax_rate,
            shipping_fee_cents: rules.shipping_fee_cents,
            free_shipping_threshold_cents: rules.free_shipping_threshold_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads_and_bridges_checkout_rules() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config");
        let config = Config::load_from(&dir).unwrap();

        assert_eq!(config.business_rules.default_low_stock_threshold, 5);
        assert_eq!(config.notifications.from_address, "orders@atelier.example");
        assert!(!config.notifications.enabled);

        let rules = CheckoutRules::from(&config.business_rules);
        assert_eq!(rules.tax_rate, 0.15);
        assert_eq!(rules.shipping_fee_cents, 1000);
        assert_eq!(rules.free_shipping_threshold_cents, 10_000);
    }
}
