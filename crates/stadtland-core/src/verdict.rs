//! Verdict grid returned by the judge, and total case-insensitive lookup.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{RoundError, RoundResult};

/// Player → category → valid, indexed by case-folded keys.
///
/// When two keys fold to the same text, the first one in reply order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictGrid {
    index: HashMap<String, HashMap<String, bool>>,
}

fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl VerdictGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from the judge's JSON reply.
    ///
    /// Only the outer shape is enforced: the reply must be an object. A
    /// player entry that is not an object yields no verdicts and a cell that
    /// is not `true` counts as invalid.
    pub fn from_value(value: &Value) -> RoundResult<Self> {
        let players = value.as_object().ok_or_else(|| {
            RoundError::response_format(format!(
                "expected an object of players, got {}",
                json_kind(value)
            ))
        })?;

        let mut index: HashMap<String, HashMap<String, bool>> = HashMap::new();
        for (player, verdicts) in players {
            let Some(verdicts) = verdicts.as_object() else {
                debug!(player = %player, kind = json_kind(verdicts), "ignoring non-object verdicts");
                continue;
            };
            let key = fold(player);
            if index.contains_key(&key) {
                debug!(player = %player, "ignoring player key that repeats in another case");
                continue;
            }
            let mut cells = HashMap::with_capacity(verdicts.len());
            for (category, valid) in verdicts {
                cells
                    .entry(fold(category))
                    .or_insert(valid.as_bool().unwrap_or(false));
            }
            index.insert(key, cells);
        }
        Ok(Self { index })
    }

    /// Insert a verdict; used by in-process judges.
    pub fn set(&mut self, player: &str, category: &str, valid: bool) {
        self.index
            .entry(fold(player))
            .or_default()
            .insert(fold(category), valid);
    }

    pub fn lookup(&self, player: &str, category: &str) -> bool {
        self.index
            .get(&fold(player))
            .and_then(|cells| cells.get(&fold(category)))
            .copied()
            .unwrap_or(false)
    }

    pub fn player_count(&self) -> usize {
        self.index.len()
    }
}

/// Whether the judge accepted `player`'s answer in `category`. Never fails:
/// any missing path is `false`.
pub fn lookup(grid: &VerdictGrid, player: &str, category: &str) -> bool {
    grid.lookup(player, category)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
