//! Actuator outputs driven by the controller.

use serde::{Deserialize, Serialize};

/// One of the two switched outputs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Light,
    Pump,
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Pump => f.write_str("pump"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_lowercase_name() {
        assert_eq!(Output::Light.to_string(), "light");
        assert_eq!(Output::Pump.to_string(), "pump");
    }
}
