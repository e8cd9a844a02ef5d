//! Vocabulary maps shared between preprocessing and the trainable unit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional token/id maps built once per corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    to_id: HashMap<String, u32>,
    to_token: HashMap<u32, String>,
}

impl Vocabulary {
    pub fn new(to_id: HashMap<String, u32>, to_token: HashMap<u32, String>) -> Self {
        debug_assert_eq!(to_id.len(), to_token.len());
        Self { to_id, to_token }
    }

    /// Assign ids 0..n over `tokens` in the order given.
    pub fn from_ordered_tokens(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut to_id = HashMap::new();
        let mut to_token = HashMap::new();
        for (id, token) in tokens.into_iter().enumerate() {
            let id = id as u32;
            to_id.insert(token.clone(), id);
            to_token.insert(id, token);
        }
        Self { to_id, to_token }
    }

    pub fn len(&self) -> usize {
        self.to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_id.is_empty()
    }

    pub fn id_of(&self, token: &str) -> Option<u32> {
        self.to_id.get(token).copied()
    }

    pub fn token_of(&self, id: u32) -> Option<&str> {
        self.to_token.get(&id).map(String::as_str)
    }
}
