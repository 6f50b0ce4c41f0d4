//! # Clocks — Where the Loop Gets Its Time
//!
//! The game loop never calls [`Instant::now`] directly. It asks a [`Clock`],
//! which also reports whether the hosting surface (a browser tab, a window)
//! is visible. Production code uses [`StdClock`]; tests and replays use
//! [`ManualClock`] and advance time by hand, which makes every timing
//! behavior of the loop checkable to the tick with no sleeps and no flakes.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// A source of monotonic time and host visibility.
pub trait Clock {
    /// Current timestamp in seconds. Only differences between readings are
    /// meaningful; the epoch is whatever the clock likes. Must never go
    /// backwards.
    fn now(&mut self) -> f64;

    /// Whether the hosting surface is visible. The loop auto-pauses when this
    /// turns false. Defaults to always visible, which suits headless use.
    fn is_visible(&self) -> bool {
        true
    }
}

/// Wall-clock time via [`Instant`], measured from clock creation.
pub struct StdClock {
    start: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// A clock driven entirely by the caller.
///
/// Cloning yields handles onto the same underlying time, so a test can keep
/// one handle while the loop owns another:
///
/// ```
/// use sepal::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let mut held_by_loop = clock.clone();
/// clock.advance(1.5);
/// assert_eq!(held_by_loop.now(), 1.5);
/// ```
#[derive(Clone)]
pub struct ManualClock {
    shared: Rc<RefCell<ManualState>>,
}

struct ManualState {
    now: f64,
    visible: bool,
}

impl ManualClock {
    /// A clock at time zero, visible.
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(ManualState {
                now: 0.0,
                visible: true,
            })),
        }
    }

    /// Move time forward. Negative values are rejected to keep the
    /// monotonicity contract honest even in tests.
    ///
    /// # Panics
    ///
    /// Panics if `seconds` is negative or NaN.
    pub fn advance(&self, seconds: f64) {
        assert!(
            seconds >= 0.0,
            "ManualClock cannot go backwards (advance by {seconds})"
        );
        self.shared.borrow_mut().now += seconds;
    }

    /// Flip host visibility, as a browser tab switch would.
    pub fn set_visible(&self, visible: bool) {
        self.shared.borrow_mut().visible = visible;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f64 {
        self.shared.borrow().now
    }

    fn is_visible(&self) -> bool {
        self.shared.borrow().visible
    }
}
