use crate::backlog::{self, DEFAULT_THRESHOLD_HOURS};
use crate::models::{BacklogEntry, Friend, SteamGame};
use crate::thumbs::{self, Thumbnail};
use std::sync::mpsc::Sender;

const API_OWNED_GAMES: &str = "https://api.steampowered.com/IPlayerService/GetOwnedGames/v1/";
const API_FRIEND_LIST: &str = "https://api.steampowered.com/ISteamUser/GetFriendList/v1/";
const API_PLAYER_SUMMARIES: &str = "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v2/";

#[derive(Clone)]
pub enum BacklogProgress {
    Fetching,
    LoadingThumbnails { current: usize, total: usize },
    Done { rows: Vec<BacklogRow> },
    NoGames,
    Error(String),
}

#[derive(Clone)]
pub enum FriendProgress {
    Done { friends: Vec<Friend> },
    NoFriends,
    Error(String),
}

/// One result row: the backlog entry plus its (possibly placeholder) cover.
#[derive(Clone)]
pub struct BacklogRow {
    pub entry: BacklogEntry,
    pub thumb: Thumbnail,
}

/// Fetch the owned-games list. `Ok(None)` means the `response.games` key was
/// absent entirely (private profile or no data); an empty `Some` is a real
/// empty library. Transport and parse failures propagate.
pub fn fetch_owned_games(
    steam_key: &str,
    steam_id: &str,
) -> Result<Option<Vec<SteamGame>>, Box<dyn std::error::Error>> {
    let url = format!(
        "{}?key={}&steamid={}&include_appinfo=true&include_played_free_games=false&format=json",
        API_OWNED_GAMES, steam_key, steam_id
    );

    let response = reqwest::blocking::get(&url)?.error_for_status()?;
    let body: serde_json::Value = response.json()?;

    Ok(parse_owned_games(&body))
}

pub fn parse_owned_games(body: &serde_json::Value) -> Option<Vec<SteamGame>> {
    body["response"]["games"].as_array().map(|arr| {
        arr.iter()
            .filter_map(|g| serde_json::from_value(g.clone()).ok())
            .collect()
    })
}

/// Fetch friend SteamIDs. Requires the profile's friend list to be public;
/// an absent or empty `friendslist.friends` both come back as an empty list,
/// the API does not let us tell "no friends" from "private" here.
pub fn fetch_friend_ids(
    steam_key: &str,
    steam_id: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let url = format!(
        "{}?key={}&steamid={}&relationship=friend&format=json",
        API_FRIEND_LIST, steam_key, steam_id
    );

    let response = reqwest::blocking::get(&url)?.error_for_status()?;
    let body: serde_json::Value = response.json()?;

    Ok(parse_friend_ids(&body))
}

pub fn parse_friend_ids(body: &serde_json::Value) -> Vec<String> {
    body["friendslist"]["friends"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|f| f["steamid"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve SteamIDs to display names in one batched request. The ids go out
/// comma-joined and unchunked; entries the endpoint does not recognize are
/// silently dropped from the response.
pub fn fetch_friend_names(
    steam_key: &str,
    steam_ids: &[String],
) -> Result<Vec<Friend>, Box<dyn std::error::Error>> {
    let url = format!(
        "{}?key={}&steamids={}&format=json",
        API_PLAYER_SUMMARIES,
        steam_key,
        urlencoding::encode(&steam_ids.join(","))
    );

    let response = reqwest::blocking::get(&url)?.error_for_status()?;
    let body: serde_json::Value = response.json()?;

    Ok(parse_player_summaries(&body))
}

pub fn parse_player_summaries(body: &serde_json::Value) -> Vec<Friend> {
    body["response"]["players"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|p| serde_json::from_value(p.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Full check pipeline: owned games -> backlog filter -> one cover per entry,
/// sequentially in ascending-hours order. Covers degrade to the placeholder
/// individually; everything else surfaces through the channel.
pub fn fetch_backlog_with_progress(
    progress_tx: Sender<BacklogProgress>,
    steam_key: String,
    steam_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let _ = progress_tx.send(BacklogProgress::Fetching);

    let games = match fetch_owned_games(&steam_key, &steam_id)? {
        Some(games) => games,
        None => {
            let _ = progress_tx.send(BacklogProgress::NoGames);
            return Ok(());
        }
    };

    let entries = backlog::filter_backlog(&games, DEFAULT_THRESHOLD_HOURS);

    let client = thumbs::client()?;
    let total = entries.len();
    let mut rows = Vec::with_capacity(total);
    for (i, entry) in entries.into_iter().enumerate() {
        let _ = progress_tx.send(BacklogProgress::LoadingThumbnails {
            current: i + 1,
            total,
        });
        let thumb = thumbs::load_thumbnail(&client, entry.appid);
        rows.push(BacklogRow { entry, thumb });
    }

    let _ = progress_tx.send(BacklogProgress::Done { rows });

    Ok(())
}

/// Friend sub-flow: ids first, then one batched name lookup.
pub fn fetch_friends_with_progress(
    progress_tx: Sender<FriendProgress>,
    steam_key: String,
    steam_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let friend_ids = fetch_friend_ids(&steam_key, &steam_id)?;
    if friend_ids.is_empty() {
        let _ = progress_tx.send(FriendProgress::NoFriends);
        return Ok(());
    }

    let friends = fetch_friend_names(&steam_key, &friend_ids)?;
    let _ = progress_tx.send(FriendProgress::Done { friends });

    Ok(())
}
