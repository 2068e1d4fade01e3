use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of visit being booked. Drives the visit duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    New,
    Returning,
}

impl VisitType {
    pub fn from_returning(is_returning: bool) -> Self {
        if is_returning {
            VisitType::Returning
        } else {
            VisitType::New
        }
    }

    pub fn is_returning(&self) -> bool {
        matches!(self, VisitType::Returning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitType::New => "new",
            VisitType::Returning => "returning",
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(VisitType::New),
            "returning" => Ok(VisitType::Returning),
            other => Err(format!("unknown visit type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_type_parsing() {
        assert_eq!("new".parse::<VisitType>(), Ok(VisitType::New));
        assert_eq!(" Returning ".parse::<VisitType>(), Ok(VisitType::Returning));
        assert!("follow-up".parse::<VisitType>().is_err());
    }

    #[test]
    fn test_visit_type_serde() {
        let json = serde_json::to_string(&VisitType::Returning).unwrap();
        assert_eq!(json, "\"returning\"");
        assert!(VisitType::from_returning(true).is_returning());
        assert_eq!(VisitType::from_returning(false).to_string(), "new");
    }
}
