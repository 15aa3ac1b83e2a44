use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Simulated viewport class used for style overrides and previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown breakpoint '{0}' (expected desktop, tablet or mobile)")]
pub struct ParseBreakpointError(pub String);

impl FromStr for Breakpoint {
    type Err = ParseBreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Breakpoint::Desktop),
            "tablet" => Ok(Breakpoint::Tablet),
            "mobile" => Ok(Breakpoint::Mobile),
            _ => Err(ParseBreakpointError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_breakpoint() {
        assert_eq!("tablet".parse::<Breakpoint>().unwrap(), Breakpoint::Tablet);
        assert_eq!(" Mobile ".parse::<Breakpoint>().unwrap(), Breakpoint::Mobile);
        assert!("watch".parse::<Breakpoint>().is_err());
    }

    #[test]
    fn test_breakpoint_serializes_lowercase() {
        let json = serde_json::to_string(&Breakpoint::Desktop).unwrap();
        assert_eq!(json, "\"desktop\"");
    }
}
