use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::Holding;

/// The session's holdings. Lives in memory only; every session starts empty.
///
/// Insertion order carries no meaning: display order always comes from
/// the active sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}
