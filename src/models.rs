use serde::Deserialize;

/// A game as returned by GetOwnedGames.
#[derive(Debug, Clone, Deserialize)]
pub struct SteamGame {
    pub appid: u64,
    pub name: String,
    #[serde(default)]
    pub playtime_forever: u64,
}

/// A backlog row derived from a `SteamGame`, playtime converted to hours.
#[derive(Debug, Clone, PartialEq)]
pub struct BacklogEntry {
    pub appid: u64,
    pub name: String,
    pub hours: f64,
}

/// A friend resolved to a display name via GetPlayerSummaries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Friend {
    pub steamid: String,
    pub personaname: String,
}
