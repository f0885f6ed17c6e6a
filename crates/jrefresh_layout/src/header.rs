//! Header lifecycle callbacks
//!
//! The controller never renders a header. It reports lifecycle changes
//! through [`HeaderHandler`], and any presentation can plug in: the bundled
//! [`DefaultHeader`] model, a host widget, or a test recorder.
//!
//! ```
//! use jrefresh_layout::header::HeaderHandler;
//!
//! #[derive(Default)]
//! struct Percent(u8);
//!
//! impl HeaderHandler for Percent {
//!     fn on_pulling(&mut self, percent: u8) {
//!         self.0 = percent;
//!     }
//!     fn on_refresh_ready(&mut self) {}
//!     fn on_refreshing(&mut self) {}
//!     fn on_refresh_completed(&mut self) {}
//! }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Lifecycle callbacks invoked synchronously at state transitions
///
/// Implementations must not block.
pub trait HeaderHandler {
    /// Pull progress toward the trigger, 0 to 100
    fn on_pulling(&mut self, percent: u8);

    /// The pull passed the trigger; releasing now refreshes
    fn on_refresh_ready(&mut self);

    /// The refresh started
    fn on_refreshing(&mut self);

    /// The refresh finished and the content is back at rest
    fn on_refresh_completed(&mut self);
}

impl<H: HeaderHandler + ?Sized> HeaderHandler for Box<H> {
    fn on_pulling(&mut self, percent: u8) {
        (**self).on_pulling(percent);
    }

    fn on_refresh_ready(&mut self) {
        (**self).on_refresh_ready();
    }

    fn on_refreshing(&mut self) {
        (**self).on_refreshing();
    }

    fn on_refresh_completed(&mut self) {
        (**self).on_refresh_completed();
    }
}

/// Shared handlers let the host keep a handle to the header it installed
impl<H: HeaderHandler + ?Sized> HeaderHandler for Rc<RefCell<H>> {
    fn on_pulling(&mut self, percent: u8) {
        self.borrow_mut().on_pulling(percent);
    }

    fn on_refresh_ready(&mut self) {
        self.borrow_mut().on_refresh_ready();
    }

    fn on_refreshing(&mut self) {
        self.borrow_mut().on_refreshing();
    }

    fn on_refresh_completed(&mut self) {
        self.borrow_mut().on_refresh_completed();
    }
}

// ============================================================================
// Default Header
// ============================================================================

/// Time source for the last-refresh label
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock [`Clock`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Status line shown by the default header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStatus {
    #[default]
    PullToRefresh,
    ReleaseToRefresh,
    Refreshing,
    Completed,
}

impl HeaderStatus {
    pub fn text(&self) -> &'static str {
        match self {
            HeaderStatus::PullToRefresh => "Pull to refresh",
            HeaderStatus::ReleaseToRefresh => "Release to refresh",
            HeaderStatus::Refreshing => "Refreshing...",
            HeaderStatus::Completed => "Refresh completed",
        }
    }
}

/// Which way the pull arrow points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowDirection {
    #[default]
    Down,
    Up,
}

/// Age of the last completed refresh, bucketed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastRefresh {
    #[default]
    Never,
    JustNow,
    WithinMinute,
    MinutesAgo(u64),
    HoursAgo(u64),
    DaysAgo(u64),
}

impl LastRefresh {
    const JUST_NOW: Duration = Duration::from_secs(30);
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * 60;
    const DAY: u64 = 24 * 60 * 60;

    /// Bucket the time elapsed since a refresh
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let secs = elapsed.as_secs();
        if elapsed < Self::JUST_NOW {
            LastRefresh::JustNow
        } else if secs < Self::MINUTE {
            LastRefresh::WithinMinute
        } else if secs < Self::HOUR {
            LastRefresh::MinutesAgo(secs / Self::MINUTE)
        } else if secs < Self::DAY {
            LastRefresh::HoursAgo(secs / Self::HOUR)
        } else {
            LastRefresh::DaysAgo(secs / Self::DAY)
        }
    }
}

impl fmt::Display for LastRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastRefresh::Never => f.write_str("never"),
            LastRefresh::JustNow => f.write_str("just now"),
            LastRefresh::WithinMinute => f.write_str("within 1 minute"),
            LastRefresh::MinutesAgo(n) => write!(f, "{n} minutes ago"),
            LastRefresh::HoursAgo(n) => write!(f, "{n} hours ago"),
            LastRefresh::DaysAgo(n) => write!(f, "{n} days ago"),
        }
    }
}

/// Presentation-free model of the stock header
///
/// Tracks the status line, arrow, spinner and last-refresh label a renderer
/// would draw. While a pull is in progress the label is re-evaluated at most
/// every 30 seconds so it does not flicker during a drag.
#[derive(Debug)]
pub struct DefaultHeader<C: Clock = SystemClock> {
    clock: C,
    status: HeaderStatus,
    arrow: ArrowDirection,
    arrow_visible: bool,
    spinner_visible: bool,
    last_percent: u8,
    is_pulling: bool,
    last_refresh_at: Option<Instant>,
    label_changed_at: Option<Instant>,
    last_refresh: LastRefresh,
}

impl DefaultHeader<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for DefaultHeader<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DefaultHeader<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            status: HeaderStatus::default(),
            arrow: ArrowDirection::Down,
            arrow_visible: true,
            spinner_visible: false,
            last_percent: 0,
            is_pulling: false,
            last_refresh_at: None,
            label_changed_at: None,
            last_refresh: LastRefresh::Never,
        }
    }

    pub fn status(&self) -> HeaderStatus {
        self.status
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }

    pub fn is_arrow_visible(&self) -> bool {
        self.arrow_visible
    }

    pub fn is_spinner_visible(&self) -> bool {
        self.spinner_visible
    }

    /// Label describing when the last refresh completed
    pub fn last_refresh(&self) -> LastRefresh {
        self.last_refresh
    }

    /// Recompute the label, unless a pull is in progress and it changed recently
    fn refresh_label(&mut self) -> Option<LastRefresh> {
        let now = self.clock.now();
        let Some(refreshed_at) = self.last_refresh_at else {
            return Some(LastRefresh::Never);
        };
        if self.is_pulling {
            if let Some(changed_at) = self.label_changed_at {
                if now.saturating_duration_since(changed_at) < LastRefresh::JUST_NOW {
                    return None;
                }
            }
        }
        self.label_changed_at = Some(now);
        Some(LastRefresh::from_elapsed(
            now.saturating_duration_since(refreshed_at),
        ))
    }
}

impl<C: Clock> HeaderHandler for DefaultHeader<C> {
    fn on_pulling(&mut self, percent: u8) {
        if percent < 100 {
            self.is_pulling = true;
        }
        self.status = HeaderStatus::PullToRefresh;
        if let Some(label) = self.refresh_label() {
            self.last_refresh = label;
        }
        if self.last_percent == 100 && percent < 100 {
            self.arrow = ArrowDirection::Down;
        }
        self.last_percent = percent;
    }

    fn on_refresh_ready(&mut self) {
        self.status = HeaderStatus::ReleaseToRefresh;
        self.arrow = ArrowDirection::Up;
    }

    fn on_refreshing(&mut self) {
        self.status = HeaderStatus::Refreshing;
        self.arrow_visible = false;
        self.spinner_visible = true;
    }

    fn on_refresh_completed(&mut self) {
        let now = self.clock.now();
        self.is_pulling = false;
        self.status = HeaderStatus::Completed;
        self.arrow_visible = true;
        self.spinner_visible = false;
        self.arrow = ArrowDirection::Down;
        self.last_refresh_at = Some(now);
        self.label_changed_at = Some(now);
        self.last_refresh = LastRefresh::JustNow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Clock advanced by hand
    #[derive(Clone)]
    struct ManualClock {
        base: Instant,
        elapsed: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                elapsed: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        fn advance(&self, by: Duration) {
            self.elapsed.set(self.elapsed.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.elapsed.get()
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        let secs = Duration::from_secs;
        assert_eq!(LastRefresh::from_elapsed(secs(0)), LastRefresh::JustNow);
        assert_eq!(LastRefresh::from_elapsed(secs(29)), LastRefresh::JustNow);
        assert_eq!(LastRefresh::from_elapsed(secs(30)), LastRefresh::WithinMinute);
        assert_eq!(LastRefresh::from_elapsed(secs(125)), LastRefresh::MinutesAgo(2));
        assert_eq!(LastRefresh::from_elapsed(secs(7_200)), LastRefresh::HoursAgo(2));
        assert_eq!(LastRefresh::from_elapsed(secs(200_000)), LastRefresh::DaysAgo(2));
        assert_eq!(LastRefresh::MinutesAgo(5).to_string(), "5 minutes ago");
    }

    #[test]
    fn test_lifecycle_updates_presentation() {
        let mut header = DefaultHeader::with_clock(ManualClock::new());

        header.on_pulling(40);
        assert_eq!(header.status(), HeaderStatus::PullToRefresh);
        assert_eq!(header.last_refresh(), LastRefresh::Never);
        assert_eq!(header.arrow(), ArrowDirection::Down);

        header.on_pulling(100);
        header.on_refresh_ready();
        assert_eq!(header.status(), HeaderStatus::ReleaseToRefresh);
        assert_eq!(header.arrow(), ArrowDirection::Up);

        header.on_refreshing();
        assert!(header.is_spinner_visible());
        assert!(!header.is_arrow_visible());

        header.on_refresh_completed();
        assert_eq!(header.status(), HeaderStatus::Completed);
        assert!(!header.is_spinner_visible());
        assert!(header.is_arrow_visible());
        assert_eq!(header.last_refresh(), LastRefresh::JustNow);
    }

    #[test]
    fn test_arrow_flips_back_when_pull_retreats() {
        let mut header = DefaultHeader::with_clock(ManualClock::new());
        header.on_pulling(100);
        header.on_refresh_ready();
        assert_eq!(header.arrow(), ArrowDirection::Up);

        header.on_pulling(80);
        assert_eq!(header.arrow(), ArrowDirection::Down);
        assert_eq!(header.status(), HeaderStatus::PullToRefresh);
    }

    #[test]
    fn test_label_throttled_during_pull() {
        let clock = ManualClock::new();
        let mut header = DefaultHeader::with_clock(clock.clone());
        header.on_refresh_completed();

        clock.advance(Duration::from_secs(20));
        header.on_pulling(10);
        // Label changed less than 30s ago, keep showing it
        assert_eq!(header.last_refresh(), LastRefresh::JustNow);

        clock.advance(Duration::from_secs(15));
        header.on_pulling(20);
        assert_eq!(header.last_refresh(), LastRefresh::WithinMinute);

        clock.advance(Duration::from_secs(10 * 60));
        header.on_pulling(30);
        assert_eq!(header.last_refresh(), LastRefresh::MinutesAgo(10));
    }

    #[test]
    fn test_shared_handler_sees_callbacks() {
        let shared = Rc::new(RefCell::new(DefaultHeader::with_clock(ManualClock::new())));
        let mut boxed: Box<dyn HeaderHandler> = Box::new(shared.clone());

        boxed.on_pulling(100);
        boxed.on_refresh_ready();
        assert_eq!(shared.borrow().status(), HeaderStatus::ReleaseToRefresh);
    }
}
