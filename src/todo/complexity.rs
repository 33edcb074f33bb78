use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// T-shirt size of a todo, ordered small to large.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Complexity {
    XS,
    S,
    #[default]
    M,
    L,
    XL,
}

impl Complexity {
    /// Long form shown next to the t-shirt size.
    pub fn label(self) -> &'static str {
        match self {
            Complexity::XS => "Very Small",
            Complexity::S => "Small",
            Complexity::M => "Medium",
            Complexity::L => "Large",
            Complexity::XL => "Very Large",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Complexity::XS => "XS",
            Complexity::S => "S",
            Complexity::M => "M",
            Complexity::L => "L",
            Complexity::XL => "XL",
        };
        write!(f, "{}", short)
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "XS" => Ok(Complexity::XS),
            "S" => Ok(Complexity::S),
            "M" => Ok(Complexity::M),
            "L" => Ok(Complexity::L),
            "XL" => Ok(Complexity::XL),
            _ => Err(format!("Invalid complexity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Complexity::XS < Complexity::S);
        assert!(Complexity::S < Complexity::M);
        assert!(Complexity::M < Complexity::L);
        assert!(Complexity::L < Complexity::XL);
    }

    #[test]
    fn test_from_str_and_display() {
        assert_eq!("xl".parse::<Complexity>().unwrap(), Complexity::XL);
        assert_eq!(Complexity::XS.to_string(), "XS");
        assert!("XXL".parse::<Complexity>().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(Complexity::XS.label(), "Very Small");
        assert_eq!(Complexity::M.label(), "Medium");
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Complexity::L).unwrap(), "\"L\"");
        let parsed: Complexity = serde_json::from_str("\"XS\"").unwrap();
        assert_eq!(parsed, Complexity::XS);
    }
}
