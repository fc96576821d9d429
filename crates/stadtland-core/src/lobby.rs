//! Open-game lobby: games waiting for players, listed newest first and
//! dropped after an hour.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Games older than this are purged on listing.
pub const GAME_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("gameName, hostId and hostName are required")]
    MissingFields,

    #[error("lobby storage error: {message}")]
    Storage { message: String },
}

pub type LobbyResult<T> = Result<T, LobbyError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub host_id: String,
    #[serde(default)]
    pub host_name: String,
}

impl NewGame {
    fn validate(&self) -> LobbyResult<()> {
        let missing = [&self.game_name, &self.host_id, &self.host_name]
            .iter()
            .any(|f| f.trim().is_empty());
        if missing {
            return Err(LobbyError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGame {
    pub id: String,
    pub game_name: String,
    pub host_id: String,
    pub host_name: String,
    pub created_at: DateTime<Utc>,
}

/// Storage for open games. Implementations must be safe to share across requests.
pub trait LobbyStore: Send + Sync {
    fn create(&self, game: NewGame, now: DateTime<Utc>) -> LobbyResult<OpenGame>;

    /// All games, newest first.
    fn list(&self) -> LobbyResult<Vec<OpenGame>>;

    /// Remove a game; removing an unknown id is not an error.
    fn delete(&self, id: &str) -> LobbyResult<()>;

    /// Drop games created before `cutoff`; returns how many were removed.
    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> LobbyResult<usize>;

    /// Purge games past [`GAME_TTL_SECS`], then list.
    fn list_fresh(&self, now: DateTime<Utc>) -> LobbyResult<Vec<OpenGame>> {
        let purged = self.purge_older_than(now - Duration::seconds(GAME_TTL_SECS))?;
        if purged > 0 {
            tracing::debug!(purged, "expired open games removed");
        }
        self.list()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLobby {
    games: Mutex<Vec<OpenGame>>,
}

impl InMemoryLobby {
    pub fn new() -> Self {
        Self::default()
    }

    fn games(&self) -> LobbyResult<std::sync::MutexGuard<'_, Vec<OpenGame>>> {
        self.games.lock().map_err(|_| LobbyError::Storage {
            message: "lobby mutex poisoned".into(),
        })
    }
}

impl LobbyStore for InMemoryLobby {
    fn create(&self, game: NewGame, now: DateTime<Utc>) -> LobbyResult<OpenGame> {
        game.validate()?;
        let game = OpenGame {
            id: Uuid::new_v4().to_string(),
            game_name: game.game_name,
            host_id: game.host_id,
            host_name: game.host_name,
            created_at: now,
        };
        self.games()?.push(game.clone());
        Ok(game)
    }

    fn list(&self) -> LobbyResult<Vec<OpenGame>> {
        let mut games = self.games()?.clone();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(games)
    }

    fn delete(&self, id: &str) -> LobbyResult<()> {
        self.games()?.retain(|g| g.id != id);
        Ok(())
    }

    fn purge_older_than(&self, cutoff: DateTime<Utc>) -> LobbyResult<usize> {
        let mut games = self.games()?;
        let before = games.len();
        games.retain(|g| g.created_at >= cutoff);
        Ok(before - games.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(name: &str) -> NewGame {
        NewGame {
            game_name: name.into(),
            host_id: "h1".into(),
            host_name: "Anna".into(),
        }
    }

    #[test]
    fn create_requires_all_fields() {
        let lobby = InMemoryLobby::new();
        let err = lobby
            .create(
                NewGame {
                    game_name: "Runde".into(),
                    host_id: " ".into(),
                    host_name: "Anna".into(),
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, LobbyError::MissingFields));
        assert!(lobby.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let lobby = InMemoryLobby::new();
        let now = Utc::now();
        lobby.create(new_game("old"), now - Duration::minutes(10)).unwrap();
        lobby.create(new_game("new"), now).unwrap();

        let names: Vec<_> = lobby.list().unwrap().into_iter().map(|g| g.game_name).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn list_fresh_purges_games_older_than_an_hour() {
        let lobby = InMemoryLobby::new();
        let now = Utc::now();
        lobby.create(new_game("stale"), now - Duration::minutes(61)).unwrap();
        lobby.create(new_game("fresh"), now - Duration::minutes(59)).unwrap();

        let games = lobby.list_fresh(now).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_name, "fresh");
        assert_eq!(lobby.list().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_only_that_game() {
        let lobby = InMemoryLobby::new();
        let a = lobby.create(new_game("a"), Utc::now()).unwrap();
        lobby.create(new_game("b"), Utc::now()).unwrap();

        lobby.delete(&a.id).unwrap();
        lobby.delete("unknown").unwrap();
        let games = lobby.list().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_name, "b");
    }

    #[test]
    fn open_game_serializes_camel_case() {
        let lobby = InMemoryLobby::new();
        let game = lobby.create(new_game("Runde"), Utc::now()).unwrap();
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["gameName"], "Runde");
        assert_eq!(json["hostName"], "Anna");
        assert!(json["createdAt"].is_string());
    }
}
