/// Notification produced by [`LoadTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// One more tracked item finished.
    Progress {
        /// Item that finished.
        url: String,
        /// Items finished so far.
        loaded: u32,
        /// Items started so far.
        total: u32,
    },
    /// Every tracked item finished. Emitted at most once per tracker.
    Completed {
        /// Items tracked.
        total: u32,
    },
    /// A tracked item failed.
    Failed {
        /// Item that failed.
        url: String,
        /// Human-readable reason.
        message: String,
    },
}

/// Counts started and finished asset loads.
///
/// Progress is `loaded / total` over every item started so far, exposed as
/// a floored percentage for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    loaded: u32,
    total: u32,
    completed: bool,
    failed: bool,
}

impl LoadTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a load that has started.
    pub fn item_start(&mut self, url: &str) {
        self.total += 1;
        log::debug!("loading {url} ({}/{})", self.loaded, self.total);
    }

    /// Register a load that finished successfully.
    ///
    /// Returns [`LoadEvent::Completed`] the first time every started item
    /// has finished, [`LoadEvent::Progress`] otherwise.
    pub fn item_end(&mut self, url: &str) -> LoadEvent {
        self.loaded = (self.loaded + 1).min(self.total.max(1));
        self.total = self.total.max(self.loaded);
        log::debug!(
            "loaded {url}: {}/{} ({}%)",
            self.loaded,
            self.total,
            self.percent()
        );
        if self.loaded == self.total && !self.completed && !self.failed {
            self.completed = true;
            log::info!("all {} assets loaded", self.total);
            LoadEvent::Completed { total: self.total }
        } else {
            LoadEvent::Progress {
                url: url.to_owned(),
                loaded: self.loaded,
                total: self.total,
            }
        }
    }

    /// Register a load that failed. The tracker never completes afterwards.
    pub fn item_error(&mut self, url: &str, error: &dyn std::error::Error) -> LoadEvent {
        self.failed = true;
        log::error!("failed to load {url}: {error}");
        LoadEvent::Failed {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// `floor(loaded * 100 / total)`, or 0 before anything started.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (u64::from(self.loaded) * 100 / u64::from(self.total)) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::LoadError;
    use super::*;

    #[test]
    fn percent_is_floored() {
        let mut t = LoadTracker::new();
        assert_eq!(t.percent(), 0);
        for url in ["a", "b", "c"] {
            t.item_start(url);
        }
        let _ = t.item_end("a");
        assert_eq!(t.percent(), 33);
        let _ = t.item_end("b");
        assert_eq!(t.percent(), 66);
    }

    #[test]
    fn completes_once_when_all_items_finish() {
        let mut t = LoadTracker::new();
        t.item_start("a");
        t.item_start("b");
        assert!(matches!(t.item_end("a"), LoadEvent::Progress { loaded: 1, total: 2, .. }));
        assert_eq!(t.item_end("b"), LoadEvent::Completed { total: 2 });
        assert!(t.completed);
        assert_eq!(t.percent(), 100);

        // a late item never re-fires completion
        t.item_start("c");
        assert!(matches!(t.item_end("c"), LoadEvent::Progress { .. }));
    }

    #[test]
    fn failure_blocks_completion() {
        let mut t = LoadTracker::new();
        t.item_start("model.glb");
        t.item_start("other");
        let event = t.item_error("model.glb", &LoadError::MissingGeometry);
        assert!(matches!(event, LoadEvent::Failed { ref url, .. } if url == "model.glb"));
        assert!(t.failed);
        let _ = t.item_end("other");
        assert!(!t.completed);
    }

    #[test]
    fn unmatched_end_never_exceeds_total() {
        let mut t = LoadTracker::new();
        let _ = t.item_end("stray");
        assert!(t.loaded <= t.total);
        assert!(t.percent() <= 100);
    }
}
