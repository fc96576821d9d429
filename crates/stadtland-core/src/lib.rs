//! Round evaluation engine for Stadtland, a word-category game ("name a
//! word starting with B for every category").
//!
//! A round passes through five stages, strictly in order:
//!
//! 1. [`preprocess`]: remove the `Block` column and blank vetoed answers
//! 2. [`oracle`]: ask the external semantic judge which answers are valid
//! 3. [`verdict`]: case-insensitive, total lookup into the judge's reply
//! 4. [`scoring`]: tie-aware points per category
//! 5. [`assemble`]: the result table
//!
//! # Quick Start
//!
//! ```no_run
//! use stadtland_core::{JudgeConfig, Round, RoundEngine};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let oracle = JudgeConfig::from_env()?.build_oracle()?;
//! let engine = RoundEngine::new(oracle);
//!
//! let round = Round::from_json(
//!     r#"{"letter": "B", "categories": ["Stadt", "Block"],
//!         "answers": {"Anna": ["Bonn", "Berlin"], "Ben": ["Bremen", ""]}}"#,
//! )?;
//! for row in engine.evaluate(round).await? {
//!     println!("{}: {:?}", row.player, row.scores);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod config;
pub mod engine;
pub mod error;
pub mod lobby;
pub mod oracle;
pub mod preprocess;
pub mod scoring;
pub mod types;
pub mod verdict;

// Re-export main types
pub use config::{JudgeConfig, JudgeProvider};
pub use engine::RoundEngine;
pub use error::{JudgeCallError, RoundError, RoundResult};
pub use lobby::{InMemoryLobby, LobbyError, LobbyStore, NewGame, OpenGame};
pub use oracle::{AttemptPolicy, JudgeBackend, JudgeRequest, Oracle};
pub use scoring::{CONSENSUS_POINTS, SHARED_POINTS, UNIQUE_POINTS};
pub use types::{AnswerSet, PlayerAnswers, Round, SanitizedRound, SanitizedRow, ScoreRow};
pub use verdict::{lookup, VerdictGrid};
