//! Session-level combat configuration.

use serde::{Deserialize, Serialize};

/// How action points refill when a combatant's turn begins.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ApRestoration {
    /// Banded from the freshly rolled initiative total.
    #[default]
    Initiative,
    /// Refill to the combatant's maximum.
    Max,
    /// Refill to a fixed amount, clamped to the maximum.
    Set,
}

/// Tunable combat behavior carried with the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub show_timers: bool,
    pub ap_restoration: ApRestoration,
    /// Refill amount used by [`ApRestoration::Set`].
    pub ap_restoration_amount: u32,
    pub health_regen_enabled: bool,
    pub mana_regen_enabled: bool,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            show_timers: true,
            ap_restoration: ApRestoration::Initiative,
            ap_restoration_amount: 3,
            health_regen_enabled: false,
            mana_regen_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn restoration_mode_parses_case_insensitively() {
        assert_eq!(ApRestoration::from_str("initiative").unwrap(), ApRestoration::Initiative);
        assert_eq!(ApRestoration::from_str("MAX").unwrap(), ApRestoration::Max);
        assert_eq!(ApRestoration::from_str("Set").unwrap(), ApRestoration::Set);
        assert!(ApRestoration::from_str("other").is_err());
    }

    #[test]
    fn partial_config_json_falls_back_to_defaults() {
        let config: CombatConfig = serde_json::from_str(r#"{"ap_restoration":"max"}"#).unwrap();
        assert_eq!(config.ap_restoration, ApRestoration::Max);
        assert!(config.show_timers);
        assert_eq!(config.ap_restoration_amount, 3);
        assert!(!config.health_regen_enabled);
    }
}
