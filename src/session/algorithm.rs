use serde::{Deserialize, Serialize};

use crate::notation::token::{MoveToken, NotationError};
use crate::notation::{normalize, parse_alg};

/// A named move sequence selected for practice. `display` keeps the
/// normalized text with grouping parentheses for rendering; `moves` is
/// the parsed sequence actually drilled. Immutable once a drill starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Algorithm {
    pub name: String,
    pub category: String,
    pub display: String,
    #[serde(skip)]
    pub moves: Vec<MoveToken>,
}

impl Algorithm {
    /// Build from free-text input. Returns `Ok(None)` when the text
    /// normalizes to nothing, which callers treat as "no algorithm
    /// entered" rather than an error.
    pub fn from_input(
        name: &str,
        category: &str,
        raw: &str,
    ) -> Result<Option<Self>, NotationError> {
        let display = normalize(raw);
        if display.is_empty() {
            return Ok(None);
        }
        let moves = parse_alg(&display)?;
        Ok(Some(Self {
            name: name.to_string(),
            category: category.to_string(),
            display,
            moves,
        }))
    }

    /// Re-parse `display` after deserialization; the token sequence is
    /// not persisted.
    pub fn rehydrate(&mut self) -> Result<(), NotationError> {
        self.moves = parse_alg(&self.display)?;
        Ok(())
    }

    /// Stable identifier for timing storage, derived from the canonical
    /// move string: spaces become underscores, primes become `p`, and
    /// anything else non-alphanumeric is dropped.
    pub fn stats_key(&self) -> String {
        let key: String = self
            .display
            .chars()
            .filter_map(|ch| match ch {
                ' ' => Some('_'),
                '\'' => Some('p'),
                c if c.is_ascii_alphanumeric() => Some(c),
                _ => None,
            })
            .collect();
        if key.is_empty() {
            "default".to_string()
        } else {
            key
        }
    }
}
