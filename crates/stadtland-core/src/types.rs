//! Round input, sanitized round and result rows.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RoundError, RoundResult};

/// Category name (case-insensitive) of the veto column.
pub const BLOCK_CATEGORY: &str = "block";

/// Comparison form of a cell: trimmed and lowercased. Output keeps the raw text.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// One round as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Round {
    #[serde(alias = "buchstabe")]
    pub letter: String,
    #[serde(alias = "kategorien")]
    pub categories: Vec<String>,
    #[serde(alias = "spieler_antworten")]
    pub answers: AnswerSet,
}

impl Round {
    pub fn new<P, A, S>(letter: impl Into<String>, categories: Vec<String>, answers: A) -> Self
    where
        A: IntoIterator<Item = (P, Vec<S>)>,
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            letter: letter.into(),
            categories,
            answers: AnswerSet::from_rows(answers),
        }
    }

    /// Parse a round from JSON. Missing or mistyped fields are validation errors.
    pub fn from_json(text: &str) -> RoundResult<Self> {
        serde_json::from_str(text).map_err(|e| RoundError::validation(e.to_string()))
    }

    /// Check the round and bring it into canonical shape: trimmed letter,
    /// every row exactly as long as `categories`.
    pub fn validated(mut self) -> RoundResult<Self> {
        let letter = self.letter.trim();
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(_), None) => {}
            (None, _) => return Err(RoundError::validation("letter is missing")),
            (Some(_), Some(_)) => {
                return Err(RoundError::validation(format!(
                    "letter must be a single character, got '{}'",
                    letter
                )))
            }
        }
        self.letter = letter.to_string();

        if let Some(pos) = self.categories.iter().position(|c| c.trim().is_empty()) {
            return Err(RoundError::validation(format!(
                "category at position {} has no name",
                pos
            )));
        }
        let block_columns = self
            .categories
            .iter()
            .filter(|c| is_block_category(c))
            .count();
        if block_columns > 1 {
            return Err(RoundError::validation(format!(
                "{} block categories; at most one is allowed",
                block_columns
            )));
        }

        let width = self.categories.len();
        for row in self.answers.rows_mut() {
            if row.answers.len() > width {
                return Err(RoundError::validation(format!(
                    "player '{}' has {} answers for {} categories",
                    row.player,
                    row.answers.len(),
                    width
                )));
            }
            row.answers.resize(width, String::new());
        }
        Ok(self)
    }
}

pub(crate) fn is_block_category(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(BLOCK_CATEGORY)
}

/// One player's raw answers, aligned with the round's categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerAnswers {
    pub player: String,
    pub answers: Vec<String>,
}

/// Player → answers, in the order the caller supplied them.
///
/// Deserializes from a JSON object; document order is kept, duplicate
/// player names are rejected and `null` cells read as empty answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    rows: Vec<PlayerAnswers>,
}

impl AnswerSet {
    pub fn from_rows<P, A, S>(rows: A) -> Self
    where
        A: IntoIterator<Item = (P, Vec<S>)>,
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|(player, answers)| PlayerAnswers {
                    player: player.into(),
                    answers: answers.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[PlayerAnswers] {
        &self.rows
    }

    fn rows_mut(&mut self) -> impl Iterator<Item = &mut PlayerAnswers> {
        self.rows.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AnswerSetVisitor;

        impl<'de> Visitor<'de> for AnswerSetVisitor {
            type Value = AnswerSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of player name to a list of answers")
            }

            fn visit_map<M>(self, mut map: M) -> Result<AnswerSet, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut seen = HashSet::new();
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((player, cells)) = map.next_entry::<String, Vec<Option<String>>>()? {
                    if !seen.insert(player.clone()) {
                        return Err(de::Error::custom(format!("duplicate player '{}'", player)));
                    }
                    rows.push(PlayerAnswers {
                        player,
                        answers: cells.into_iter().map(Option::unwrap_or_default).collect(),
                    });
                }
                Ok(AnswerSet { rows })
            }
        }

        deserializer.deserialize_map(AnswerSetVisitor)
    }
}

/// A player's row after block-column removal and veto blanking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedRow {
    pub player: String,
    /// Aligned with [`SanitizedRound::categories`]; vetoed cells are empty.
    pub answers: Vec<String>,
    /// Raw block-column value, empty if none.
    pub block_word: String,
}

/// Sanitized categories and answers, carried together through every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedRound {
    pub letter: String,
    pub categories: Vec<String>,
    pub rows: Vec<SanitizedRow>,
}

impl SanitizedRound {
    pub fn player_count(&self) -> usize {
        self.rows.len()
    }
}

/// One line of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    pub player: String,
    pub answers: Vec<String>,
    pub scores: Vec<u32>,
    pub block_word: String,
}
