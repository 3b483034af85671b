//! Best-score tracking
//!
//! One best score per `highScoreKey`, persisted to LocalStorage as a plain
//! number string. Without a key nothing is tracked.

/// Best score for one key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScore {
    key: Option<String>,
    best: u64,
}

impl HighScore {
    /// Untracked-until-loaded best score
    pub fn new(key: Option<String>) -> Self {
        Self { key, best: 0 }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Parse a stored value. Anything that isn't a non-negative number is
    /// ignored.
    pub fn parse_stored(raw: &str) -> Option<u64> {
        let v: f64 = raw.trim().parse().ok()?;
        (v.is_finite() && v >= 0.0).then(|| v.floor() as u64)
    }

    /// Fold in a final score. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if self.key.is_none() || score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(key: Option<String>) -> Self {
        let mut hs = Self::new(key);
        let Some(key) = hs.key.clone() else {
            return hs;
        };

        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(&key) {
                if let Some(best) = Self::parse_stored(&raw) {
                    log::info!("Loaded high score {} for {}", best, key);
                    hs.best = best;
                }
            }
        }
        hs
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let Some(key) = self.key.as_deref() else {
            return;
        };
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(key, &self.best.to_string()).is_ok() {
                log::info!("High score saved ({} = {})", key, self.best);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(key: Option<String>) -> Self {
        Self::new(key)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // In-memory only on native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_max() {
        let mut hs = HighScore::new(Some("runner".into()));
        assert!(hs.record(40));
        assert!(!hs.record(12));
        assert!(hs.record(41));
        assert_eq!(hs.best(), 41);
    }

    #[test]
    fn test_no_key_no_tracking() {
        let mut hs = HighScore::new(None);
        assert!(!hs.record(100));
        assert_eq!(hs.best(), 0);
    }

    #[test]
    fn test_parse_stored() {
        assert_eq!(HighScore::parse_stored("120"), Some(120));
        assert_eq!(HighScore::parse_stored(" 33.9 "), Some(33));
        assert_eq!(HighScore::parse_stored("NaN"), None);
        assert_eq!(HighScore::parse_stored("-4"), None);
        assert_eq!(HighScore::parse_stored("abc"), None);
    }
}
