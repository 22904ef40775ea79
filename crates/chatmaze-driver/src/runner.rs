use chatmaze_core::chat::{ChatSource, User};
use chatmaze_core::error::StoreError;
use chatmaze_core::events::GameEvent;
use chatmaze_core::store::StateStore;
use chatmaze_core::time::Timestamp;
use chatmaze_hunt::Simulation;

/// Running totals reported when the driver stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub ticks: u64,
    pub polls: u64,
    pub failed_polls: u64,
    pub coins: u64,
    pub keys: u64,
    pub rounds: u64,
}

/// Owns the simulation and its two collaborators.
///
/// All methods are synchronous; the binary decides when to call them.
/// Between polls every tick reuses the last roster the source returned.
pub struct Driver<S, T> {
    simulation: Simulation,
    source: S,
    store: T,
    roster: Vec<User>,
    stats: DriverStats,
}

impl<S: ChatSource, T: StateStore> Driver<S, T> {
    pub fn new(simulation: Simulation, source: S, store: T) -> Self {
        Self {
            simulation,
            source,
            store,
            roster: Vec::new(),
            stats: DriverStats::default(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Load saved state into the simulation. A load failure starts empty.
    pub fn restore(&mut self) {
        match self.store.load() {
            Ok(document) => self.simulation.load(document),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load saved state, starting empty");
            },
        }
    }

    /// Fetch a fresh roster. On error the previous roster is kept.
    pub fn poll(&mut self, now: Timestamp) {
        self.stats.polls += 1;
        match self.source.poll(now) {
            Ok(users) => {
                tracing::trace!(source = self.source.name(), users = users.len(), "Polled chat");
                self.roster = users;
            },
            Err(e) => {
                self.stats.failed_polls += 1;
                tracing::warn!(source = self.source.name(), error = %e, "Chat poll failed");
            },
        }
    }

    /// Advance the simulation with the current roster.
    pub fn tick(&mut self, now: Timestamp) -> Vec<GameEvent> {
        self.stats.ticks += 1;
        let events = self.simulation.update(now, &self.roster);
        for event in &events {
            match event {
                GameEvent::CoinCollected { .. } => self.stats.coins += 1,
                GameEvent::KeyCollected { .. } => self.stats.keys += 1,
                GameEvent::RoundReset { .. } => self.stats.rounds += 1,
            }
        }
        events
    }

    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.simulation.save())
    }
}

#[cfg(test)]
mod tests {
    use chatmaze_core::error::SourceError;
    use chatmaze_core::store::SaveDocument;
    use chatmaze_core::test_helpers::{make_user, say};
    use chatmaze_hunt::HuntConfig;
    use chatmaze_store::MemoryStore;

    use super::*;

    /// Hands out queued results, then fails.
    struct Canned(Vec<Result<Vec<User>, SourceError>>);

    impl ChatSource for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn poll(&mut self, _now: Timestamp) -> Result<Vec<User>, SourceError> {
            if self.0.is_empty() {
                return Err(SourceError::Unavailable("drained".to_string()));
            }
            self.0.remove(0)
        }
    }

    fn driver(results: Vec<Result<Vec<User>, SourceError>>) -> Driver<Canned, MemoryStore> {
        let simulation = Simulation::with_seed(HuntConfig::default(), 4);
        Driver::new(simulation, Canned(results), MemoryStore::new())
    }

    #[test]
    fn ticks_reuse_last_roster() {
        let mut driver = driver(vec![Ok(vec![make_user("a"), make_user("b")])]);
        driver.poll(0);
        driver.tick(10);
        driver.tick(20);

        assert_eq!(driver.simulation().player_count(), 2);
        assert_eq!(driver.stats().ticks, 2);
    }

    #[test]
    fn failed_poll_keeps_previous_roster() {
        let mut driver = driver(vec![Ok(vec![make_user("a")])]);
        driver.poll(0);
        driver.poll(100);
        driver.tick(200);

        assert_eq!(driver.simulation().player_count(), 1);
        assert_eq!(driver.stats().polls, 2);
        assert_eq!(driver.stats().failed_polls, 1);
    }

    #[test]
    fn save_and_restore_through_store() {
        let mut driver = driver(vec![Ok(vec![say("a", "m1", "!character customize 3", 0)])]);
        driver.poll(0);
        driver.tick(0);
        driver.save().unwrap();
        let document = driver.store().snapshot();
        assert_eq!(document.processed_messages, vec!["m1".to_string()]);

        let simulation = Simulation::with_seed(HuntConfig::default(), 8);
        let mut resumed = Driver::new(simulation, Canned(Vec::new()), MemoryStore::with_document(document));
        resumed.restore();

        assert_eq!(resumed.simulation().player("a").unwrap().character, 3);
        assert!(resumed.simulation().is_processed("m1"));
    }

    #[test]
    fn restore_from_empty_store_is_a_fresh_game() {
        let mut driver = driver(Vec::new());
        driver.restore();
        assert_eq!(driver.simulation().player_count(), 0);
        assert_eq!(driver.store().snapshot(), SaveDocument::default());
    }
}
