use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three collections exposed by the remote API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Character,
    Clan,
    Village,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Character, Endpoint::Clan, Endpoint::Village];

    /// Singular type name (`character`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Character => "character",
            Endpoint::Clan => "clan",
            Endpoint::Village => "village",
        }
    }

    /// URL path segment and list key in the response body (`characters`)
    pub fn plural(&self) -> &'static str {
        match self {
            Endpoint::Character => "characters",
            Endpoint::Clan => "clans",
            Endpoint::Village => "villages",
        }
    }

    /// Grid title and nav label
    pub fn title(&self) -> &'static str {
        match self {
            Endpoint::Character => "Characters",
            Endpoint::Clan => "Clans",
            Endpoint::Village => "Villages",
        }
    }

    pub fn search_placeholder(&self) -> String {
        format!("Search {}...", self.title())
    }

    /// Position in the nav bar (0-based)
    pub fn index(&self) -> usize {
        match self {
            Endpoint::Character => 0,
            Endpoint::Clan => 1,
            Endpoint::Village => 2,
        }
    }

    pub fn next(&self) -> Endpoint {
        Endpoint::ALL[(self.index() + 1) % Endpoint::ALL.len()]
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Character
    }
}

impl std::str::FromStr for Endpoint {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "character" | "characters" => Ok(Endpoint::Character),
            "clan" | "clans" => Ok(Endpoint::Clan),
            "village" | "villages" => Ok(Endpoint::Village),
            _ => Err(anyhow!(
                "Invalid endpoint '{s}'. Valid options: character, clan, village"
            )),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized list response, whatever envelope the API used
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult {
    pub list: Vec<Value>,
    pub current_page: u32,
    pub page_size: u32,
    /// Best effort; equals `list.len()` when the body carried no total
    pub total: u64,
}

/// One fetch issued by the page controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonic sequence number; responses for older numbers are dropped
    pub seq: u64,
    pub endpoint: Endpoint,
    pub page: u32,
    pub search: String,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    PageLoaded { seq: u64, result: PageResult },
    PageFailed { seq: u64, message: String },
    StatsLoaded { endpoint: Endpoint, total: u64 },
    Quit,
}
