use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Priority levels for todos.
/// A is the highest, F the lowest assigned one, Unset (blank) sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    A,
    B,
    C,
    D,
    E,
    F,
    #[default]
    Unset,
}

impl Priority {
    pub const ALL: [Priority; 7] = [
        Priority::A,
        Priority::B,
        Priority::C,
        Priority::D,
        Priority::E,
        Priority::F,
        Priority::Unset,
    ];

    /// The single character used on the wire and in the views.
    pub fn as_char(self) -> char {
        match self {
            Priority::A => 'A',
            Priority::B => 'B',
            Priority::C => 'C',
            Priority::D => 'D',
            Priority::E => 'E',
            Priority::F => 'F',
            Priority::Unset => ' ',
        }
    }

    pub fn is_high(self) -> bool {
        self == Priority::A
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Priority::A),
            "B" => Ok(Priority::B),
            "C" => Ok(Priority::C),
            "D" => Ok(Priority::D),
            "E" => Ok(Priority::E),
            "F" => Ok(Priority::F),
            "" => Ok(Priority::Unset),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            None => Ok(Priority::Unset),
            Some(value) => value.parse().map_err(serde::de::Error::custom),
        }
    }
}
