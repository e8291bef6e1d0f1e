//! On-disk rate card cache
//!
//! Rate cards are large and slow to fetch, so each offer's card is cached
//! as JSON under `~/.azcost/` and reused indefinitely; `--refresh` forces a
//! new fetch. A failed save is non-fatal.

use crate::types::{AzcostError, RateCard, Result};
use std::fs;
use std::path::PathBuf;

/// Per-offer rate card cache rooted at a directory
pub struct RateCardCache {
    dir: PathBuf,
}

impl RateCardCache {
    /// Cache under the default directory (~/.azcost)
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: Self::default_dir()?,
        })
    }

    /// Cache under a custom directory (for testing)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn default_dir() -> Result<PathBuf> {
        let home = directories::UserDirs::new()
            .ok_or_else(|| AzcostError::Cache("failed to get home directory".into()))?
            .home_dir()
            .to_path_buf();
        Ok(home.join(".azcost"))
    }

    /// Cache file for an offer
    pub fn path(&self, offer: &str) -> PathBuf {
        self.dir.join(format!("{}.rates.json", offer))
    }

    /// Load a cached rate card; errors cover both a missing file and a
    /// corrupt one, and the caller falls back to fetching
    pub fn load(&self, offer: &str) -> Result<RateCard> {
        let content = fs::read_to_string(self.path(offer))?;
        serde_json::from_str(&content)
            .map_err(|e| AzcostError::Cache(format!("invalid cache format: {}", e)))
    }

    /// Save a rate card for an offer
    pub fn save(&self, offer: &str, card: &RateCard) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string(card)
            .map_err(|e| AzcostError::Cache(format!("serialization failed: {}", e)))?;
        fs::write(self.path(offer), content)?;
        Ok(())
    }
}
