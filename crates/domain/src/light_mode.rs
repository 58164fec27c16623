//! Light mode: automatic schedule or manual override.

use serde::{Deserialize, Serialize};

/// Who decides whether the grow-light is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightMode {
    /// Follow the schedule.
    #[default]
    Auto,
    ForcedOn,
    ForcedOff,
}

impl LightMode {
    /// Mode matching a manual `PUT /light` request.
    #[must_use]
    pub fn forced(on: bool) -> Self {
        if on { Self::ForcedOn } else { Self::ForcedOff }
    }

    /// The fixed light state for a forced mode, `None` in [`Auto`](Self::Auto).
    #[must_use]
    pub fn override_state(self) -> Option<bool> {
        match self {
            Self::Auto => None,
            Self::ForcedOn => Some(true),
            Self::ForcedOff => Some(false),
        }
    }
}

impl std::fmt::Display for LightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::ForcedOn => f.write_str("forced_on"),
            Self::ForcedOff => f.write_str("forced_off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_auto() {
        assert_eq!(LightMode::default(), LightMode::Auto);
    }

    #[test]
    fn should_map_manual_request_to_forced_mode() {
        assert_eq!(LightMode::forced(true), LightMode::ForcedOn);
        assert_eq!(LightMode::forced(false), LightMode::ForcedOff);
    }

    #[test]
    fn should_expose_override_only_when_forced() {
        assert_eq!(LightMode::Auto.override_state(), None);
        assert_eq!(LightMode::ForcedOn.override_state(), Some(true));
        assert_eq!(LightMode::ForcedOff.override_state(), Some(false));
    }

    #[test]
    fn should_serialize_as_snake_case() {
        let json = serde_json::to_string(&LightMode::ForcedOn).unwrap();
        assert_eq!(json, "\"forced_on\"");
    }
}
