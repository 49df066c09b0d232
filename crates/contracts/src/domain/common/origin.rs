use serde::{Deserialize, Serialize};

/// Where an aggregate's data originates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Created and maintained in this console
    Console,
    /// Reported by a charge point over OCPP
    Station,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Console => "console",
            Origin::Station => "station",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
