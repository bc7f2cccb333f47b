//! C++ language standards.
//!
//! The recipe only cares about ordering (`requested >= minimum`), but the
//! parser accepts the spellings profiles use in the wild: `17`, `c++17`,
//! `gnu17`.

use serde::{Deserialize, Serialize};

/// C++ standard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CppStandard {
    /// C++98
    #[serde(rename = "98", alias = "c++98", alias = "gnu98")]
    Cpp98,
    /// C++11
    #[serde(rename = "11", alias = "c++11", alias = "gnu11")]
    Cpp11,
    /// C++14
    #[serde(rename = "14", alias = "c++14", alias = "gnu14")]
    Cpp14,
    /// C++17
    #[serde(rename = "17", alias = "c++17", alias = "gnu17")]
    Cpp17,
    /// C++20
    #[serde(rename = "20", alias = "c++20", alias = "gnu20")]
    Cpp20,
    /// C++23
    #[serde(rename = "23", alias = "c++23", alias = "gnu23")]
    Cpp23,
}

impl CppStandard {
    /// Minimum standard the library compiles with.
    pub const MINIMUM: CppStandard = CppStandard::Cpp17;

    /// The bare year digits (e.g. "17").
    pub fn as_str(&self) -> &'static str {
        match self {
            CppStandard::Cpp98 => "98",
            CppStandard::Cpp11 => "11",
            CppStandard::Cpp14 => "14",
            CppStandard::Cpp17 => "17",
            CppStandard::Cpp20 => "20",
            CppStandard::Cpp23 => "23",
        }
    }
}

impl std::str::FromStr for CppStandard {
    type Err = CppStandardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches("c++")
            .trim_start_matches("gnu")
            .trim_start_matches("cpp");

        match digits {
            "98" => Ok(CppStandard::Cpp98),
            "11" => Ok(CppStandard::Cpp11),
            "14" => Ok(CppStandard::Cpp14),
            "17" => Ok(CppStandard::Cpp17),
            "20" => Ok(CppStandard::Cpp20),
            "23" => Ok(CppStandard::Cpp23),
            _ => Err(CppStandardParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid C++ standard string.
#[derive(Debug, Clone)]
pub struct CppStandardParseError(pub String);

impl std::fmt::Display for CppStandardParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid C++ standard '{}', valid values: 98, 11, 14, 17, 20, 23",
            self.0
        )
    }
}

impl std::error::Error for CppStandardParseError {}

impl std::fmt::Display for CppStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C++{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        assert_eq!("17".parse::<CppStandard>().unwrap(), CppStandard::Cpp17);
        assert_eq!("gnu17".parse::<CppStandard>().unwrap(), CppStandard::Cpp17);
        assert_eq!("c++20".parse::<CppStandard>().unwrap(), CppStandard::Cpp20);
        assert_eq!("gnu98".parse::<CppStandard>().unwrap(), CppStandard::Cpp98);
        assert!("16".parse::<CppStandard>().is_err());
    }

    #[test]
    fn test_ordering_against_minimum() {
        assert!(CppStandard::Cpp14 < CppStandard::MINIMUM);
        assert!(CppStandard::Cpp17 >= CppStandard::MINIMUM);
        assert!(CppStandard::Cpp23 > CppStandard::MINIMUM);
    }

    #[test]
    fn test_display() {
        assert_eq!(CppStandard::Cpp17.to_string(), "C++17");
    }
}
