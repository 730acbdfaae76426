//! Delivery cities.

use serde::{Deserialize, Serialize};

/// A city the shop delivers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Faisalabad,
    Lahore,
    Karachi,
    Islamabad,
    Peshawar,
}

impl City {
    /// Every delivery city, in the order the picker lists them.
    pub const ALL: [Self; 5] = [
        Self::Faisalabad,
        Self::Lahore,
        Self::Karachi,
        Self::Islamabad,
        Self::Peshawar,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Faisalabad => "Faisalabad",
            Self::Lahore => "Lahore",
            Self::Karachi => "Karachi",
            Self::Islamabad => "Islamabad",
            Self::Peshawar => "Peshawar",
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for City {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("we do not deliver to {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(" lahore ".parse::<City>().unwrap(), City::Lahore);
        assert!("Quetta".parse::<City>().is_err());
    }
}
