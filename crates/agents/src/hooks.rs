//! Opening-hook catalog and the selection strategy the content creator uses.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trendcast_common::{Result, TrendcastError};

/// Picks an index into a catalog of `len` entries. `len` is never zero.
pub trait HookSelector: Send + Sync {
    fn select(&self, len: usize) -> usize;
}

/// Uniform selection backed by a seedable RNG.
pub struct RandomHookSelector {
    rng: Mutex<StdRng>,
}

impl RandomHookSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same seed, same sequence of picks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl HookSelector for RandomHookSelector {
    fn select(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len.max(1))
    }
}

/// Non-empty, ordered list of rhetorical-opening instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct HookCatalog {
    hooks: Vec<String>,
}

impl HookCatalog {
    pub fn new<I, S>(hooks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hooks: Vec<String> = hooks
            .into_iter()
            .map(Into::into)
            .filter(|h| !h.trim().is_empty())
            .collect();
        if hooks.is_empty() {
            return Err(TrendcastError::Config(
                "hook catalog must contain at least one hook".into(),
            ));
        }
        Ok(Self { hooks })
    }

    pub fn hooks(&self) -> &[String] {
        &self.hooks
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Choose one hook. Out-of-range indices from a selector wrap around.
    pub fn pick(&self, selector: &dyn HookSelector) -> &str {
        let index = selector.select(self.hooks.len()) % self.hooks.len();
        &self.hooks[index]
    }
}

impl Default for HookCatalog {
    fn default() -> Self {
        Self {
            hooks: default_hooks(),
        }
    }
}

impl TryFrom<Vec<String>> for HookCatalog {
    type Error = TrendcastError;

    fn try_from(hooks: Vec<String>) -> Result<Self> {
        Self::new(hooks)
    }
}

impl From<HookCatalog> for Vec<String> {
    fn from(catalog: HookCatalog) -> Self {
        catalog.hooks
    }
}

pub fn default_hooks() -> Vec<String> {
    [
        "Ask a provocative question about one of the trends.",
        "Make a bold, contrarian statement related to a trend.",
        "Share a surprising or little-known fact about the topic.",
        "Describe a vivid, short scenario that puts the trend in action.",
        "Use a metaphor or analogy connected to one of the trends.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
