//! Random transaction identifiers.
//!
//! Identifiers are drawn from a pseudo-random generator that is reseeded
//! from the operating system’s entropy source every ten to twenty minutes.
//! This bounds how long an observer can predict identifiers without paying
//! for an entropy read on every query.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// The exclusive upper bound of generated identifiers.
pub const ID_LIMIT: u16 = 0x8000;

/// The minimum number of seconds between reseeds.
pub const MIN_RESEED_INTERVAL: i64 = 600;

/// The maximum number of seconds between reseeds.
pub const MAX_RESEED_INTERVAL: i64 = 1200;

//------------ Clock ---------------------------------------------------------

/// A source of the current time.
pub trait Clock {
    /// Returns the current time in seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// The system’s wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        time::OffsetDateTime::now_utc().unix_timestamp()
    }
}

//------------ IdGenerator ---------------------------------------------------

/// A generator for 15 bit transaction identifiers.
#[derive(Debug)]
pub struct IdGenerator<C = SystemClock> {
    /// The generator the identifiers are drawn from.
    rng: StdRng,

    /// The time after which the generator needs to be reseeded.
    ///
    /// If this is `None`, the generator has never been seeded.
    next_reseed: Option<i64>,

    /// Where we get the time from.
    clock: C,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator using the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> IdGenerator<C> {
    /// Creates a generator using the given clock.
    ///
    /// The generator is seeded from entropy when the first identifier is
    /// requested.
    pub fn with_clock(clock: C) -> Self {
        IdGenerator {
            rng: StdRng::seed_from_u64(0),
            next_reseed: None,
            clock,
        }
    }

    /// Returns the time of the next reseed.
    pub fn next_reseed(&self) -> Option<i64> {
        self.next_reseed
    }

    /// Returns the next identifier.
    ///
    /// The value is uniformly distributed over `0..0x8000`.
    pub fn next_id(&mut self) -> u16 {
        let now = self.clock.now();
        if self.next_reseed.map_or(true, |deadline| now > deadline) {
            self.reseed(now)
        }
        self.rng.gen_range(0..ID_LIMIT)
    }

    fn reseed(&mut self, now: i64) {
        self.rng = StdRng::from_entropy();
        let interval =
            self.rng.gen_range(MIN_RESEED_INTERVAL..=MAX_RESEED_INTERVAL);
        self.next_reseed = Some(now.saturating_add(interval));
    }
}

impl Default for IdGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

//------------ random_id -----------------------------------------------------

thread_local! {
    static GENERATOR: RefCell<IdGenerator> = RefCell::new(IdGenerator::new());
}

/// Returns a new transaction identifier from the thread’s generator.
pub fn random_id() -> u16 {
    GENERATOR.with(|generator| generator.borrow_mut().next_id())
}

//============ Testing ======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeClock(Rc<Cell<i64>>);

    impl FakeClock {
        fn set(&self, now: i64) {
            self.0.set(now)
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> i64 {
            self.0.get()
        }
    }

    #[test]
    fn ids_in_range() {
        let mut generator = IdGenerator::new();
        for _ in 0..10_000 {
            assert!(generator.next_id() < ID_LIMIT);
        }
        for _ in 0..1000 {
            assert!(random_id() < ID_LIMIT);
        }
    }

    #[test]
    fn reseed_deadline() {
        let clock = FakeClock::default();
        clock.set(1_000_000);
        let mut generator = IdGenerator::with_clock(clock.clone());
        assert_eq!(generator.next_reseed(), None);

        generator.next_id();
        let deadline = generator.next_reseed().unwrap();
        assert!(deadline >= 1_000_000 + MIN_RESEED_INTERVAL);
        assert!(deadline <= 1_000_000 + MAX_RESEED_INTERVAL);

        // Reaching the deadline isn’t enough, it has to be crossed.
        clock.set(deadline);
        generator.next_id();
        generator.next_id();
        assert_eq!(generator.next_reseed(), Some(deadline));

        clock.set(deadline + 1);
        generator.next_id();
        let second = generator.next_reseed().unwrap();
        assert!(second >= deadline + 1 + MIN_RESEED_INTERVAL);
        assert!(second <= deadline + 1 + MAX_RESEED_INTERVAL);

        // Still only one reseed per call even far in the future.
        clock.set(second + 100_000);
        generator.next_id();
        let third = generator.next_reseed().unwrap();
        assert!(third >= second + 100_000 + MIN_RESEED_INTERVAL);
        generator.next_id();
        assert_eq!(generator.next_reseed(), Some(third));
    }
}
