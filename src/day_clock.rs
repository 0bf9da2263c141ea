use chrono::{DateTime, Duration, Local, NaiveDate};
use tracing::debug;

/// Periodic backstop interval for day-change checks, in seconds
pub const DAY_CHECK_INTERVAL_SECS: i64 = 300;

/// How long the refresh pulse stays up before resetting, in milliseconds
pub const PULSE_RESET_DELAY_MS: i64 = 100;

/// Source of the current wall-clock time. Injected so tests can drive time
/// manually; production uses [`SystemClock`].
pub trait WallClock {
    fn now(&self) -> DateTime<Local>;
}

/// Live wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Notification delivered to day clock subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayClockEvent {
    /// The local calendar day moved
    DayChanged {
        previous: NaiveDate,
        current: NaiveDate,
    },
    /// The transient refresh pulse went up (true) or back down (false).
    /// Consumers re-run their "today" queries on the rising edge.
    PulseChanged(bool),
}

/// Handle returned by [`DayClock::subscribe`], used to unsubscribe
pub type SubscriptionId = u64;

type Observer = Box<dyn FnMut(&DayClockEvent)>;

/// Owns the notion of "current local day" and tells subscribers when it moves
///
/// One instance is constructed at startup and passed by reference to every
/// consumer; there is no global lookup. The host relays two platform signals
/// ([`day_boundary_crossed`](Self::day_boundary_crossed),
/// [`process_resumed`](Self::process_resumed)) and calls
/// [`poll`](Self::poll) from its tick loop as a backstop. Each trigger
/// re-reads the live wall clock; a backwards clock change is trusted like any
/// other.
pub struct DayClock<C: WallClock = SystemClock> {
    clock: C,
    current_day: NaiveDate,
    refresh_pulse: bool,
    pulse_reset_at: Option<DateTime<Local>>,
    next_check_at: DateTime<Local>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription_id: SubscriptionId,
}

impl DayClock<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for DayClock<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: WallClock> DayClock<C> {
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            current_day: now.date_naive(),
            refresh_pulse: false,
            pulse_reset_at: None,
            next_check_at: now + Duration::seconds(DAY_CHECK_INTERVAL_SECS),
            observers: Vec::new(),
            next_subscription_id: 0,
            clock,
        }
    }

    /// Start of the current local day
    pub fn current_day(&self) -> NaiveDate {
        self.current_day
    }

    /// Whether the transient refresh pulse is currently up
    pub fn refresh_pulse(&self) -> bool {
        self.refresh_pulse
    }

    /// Register an observer; events are delivered synchronously inside the
    /// trigger call that produced them
    pub fn subscribe(&mut self, observer: impl FnMut(&DayClockEvent) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Release one observer. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Single teardown: drops every subscription and any pending pulse reset
    pub fn shutdown(&mut self) {
        self.observers.clear();
        self.pulse_reset_at = None;
        self.refresh_pulse = false;
    }

    /// Host relay for the OS calendar-day notification (fires near local
    /// midnight or on timezone/clock change)
    pub fn day_boundary_crossed(&mut self) {
        let now = self.clock.now();
        self.check_day(now);
    }

    /// Host relay for resume-from-background; the day may have moved while
    /// the process was suspended
    pub fn process_resumed(&mut self) {
        let now = self.clock.now();
        self.check_day(now);
    }

    /// Tick-loop entry point: finishes a pending pulse and, at most once per
    /// [`DAY_CHECK_INTERVAL_SECS`], re-checks the day in case the platform
    /// signals were missed
    pub fn poll(&mut self) {
        let now = self.clock.now();

        if let Some(reset_at) = self.pulse_reset_at {
            if now >= reset_at {
                self.end_pulse();
            }
        }

        if now >= self.next_check_at {
            self.next_check_at = now + Duration::seconds(DAY_CHECK_INTERVAL_SECS);
            self.check_day(now);
        }
    }

    /// Manual trigger: snap `current_day` to today and pulse unconditionally,
    /// even if the day did not change
    pub fn force_refresh(&mut self) {
        let now = self.clock.now();
        let new_day = now.date_naive();
        if new_day != self.current_day {
            let previous = self.current_day;
            self.current_day = new_day;
            self.emit(&DayClockEvent::DayChanged {
                previous,
                current: new_day,
            });
        }
        self.begin_pulse(now);
    }

    fn check_day(&mut self, now: DateTime<Local>) {
        let new_day = now.date_naive();
        if new_day == self.current_day {
            return;
        }

        let previous = self.current_day;
        self.current_day = new_day;
        debug!(%previous, current = %new_day, "day change detected");

        self.emit(&DayClockEvent::DayChanged {
            previous,
            current: new_day,
        });
        self.begin_pulse(now);
    }

    fn begin_pulse(&mut self, now: DateTime<Local>) {
        // A change arriving while a pulse is still up closes that pulse
        // first, so back-to-back day changes each get their own true→false
        // cycle instead of being coalesced.
        if self.refresh_pulse {
            self.end_pulse();
        }
        self.refresh_pulse = true;
        self.pulse_reset_at = Some(now + Duration::milliseconds(PULSE_RESET_DELAY_MS));
        self.emit(&DayClockEvent::PulseChanged(true));
    }

    fn end_pulse(&mut self) {
        self.refresh_pulse = false;
        self.pulse_reset_at = None;
        self.emit(&DayClockEvent::PulseChanged(false));
    }

    fn emit(&mut self, event: &DayClockEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock {
        now: Rc<Cell<DateTime<Local>>>,
    }

    impl ManualClock {
        fn at(now: DateTime<Local>) -> Self {
            Self {
                now: Rc::new(Cell::new(now)),
            }
        }

        fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }
    }

    impl WallClock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            self.now.get()
        }
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn recording_clock(start: DateTime<Local>) -> (DayClock<ManualClock>, ManualClock, Rc<RefCell<Vec<DayClockEvent>>>) {
        let manual = ManualClock::at(start);
        let mut clock = DayClock::with_clock(manual.clone());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        clock.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (clock, manual, events)
    }

    fn pulse_counts(events: &[DayClockEvent]) -> (usize, usize) {
        let up = events
            .iter()
            .filter(|e| **e == DayClockEvent::PulseChanged(true))
            .count();
        let down = events
            .iter()
            .filter(|e| **e == DayClockEvent::PulseChanged(false))
            .count();
        (up, down)
    }

    #[test]
    fn test_check_within_same_day_is_quiet() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 8, 0));
        let day = clock.current_day();

        manual.advance(Duration::hours(10));
        clock.process_resumed();
        clock.day_boundary_crossed();

        assert_eq!(clock.current_day(), day);
        assert!(!clock.refresh_pulse());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_resume_across_midnight_updates_day_and_pulses() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 23, 50));

        manual.advance(Duration::minutes(20));
        clock.process_resumed();

        assert_eq!(
            clock.current_day(),
            NaiveDate::from_ymd_opt(2025, 11, 21).unwrap()
        );
        assert!(clock.refresh_pulse());
        assert_eq!(
            events.borrow()[0],
            DayClockEvent::DayChanged {
                previous: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
                current: NaiveDate::from_ymd_opt(2025, 11, 21).unwrap(),
            }
        );
        assert_eq!(events.borrow()[1], DayClockEvent::PulseChanged(true));

        // The pulse resets on the next poll after the delay
        manual.advance(Duration::milliseconds(PULSE_RESET_DELAY_MS));
        clock.poll();
        assert!(!clock.refresh_pulse());

        let (up, down) = pulse_counts(&events.borrow());
        assert_eq!((up, down), (1, 1));
    }

    #[test]
    fn test_poll_backstop_detects_missed_midnight() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 23, 58));

        // First poll inside the rate-limit window does nothing even though
        // midnight has passed
        manual.advance(Duration::minutes(3));
        clock.poll();
        assert_eq!(
            clock.current_day(),
            NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
        );
        assert!(events.borrow().is_empty());

        // Once the interval elapses, the backstop catches the change
        manual.advance(Duration::seconds(DAY_CHECK_INTERVAL_SECS));
        clock.poll();
        assert_eq!(
            clock.current_day(),
            NaiveDate::from_ymd_opt(2025, 11, 21).unwrap()
        );
        assert!(clock.refresh_pulse());
    }

    #[test]
    fn test_back_to_back_day_changes_pulse_separately() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 23, 59));

        manual.advance(Duration::minutes(2));
        clock.day_boundary_crossed();

        // Second change lands before the first pulse reset
        manual.advance(Duration::days(1));
        clock.day_boundary_crossed();

        manual.advance(Duration::milliseconds(PULSE_RESET_DELAY_MS));
        clock.poll();

        let (up, down) = pulse_counts(&events.borrow());
        assert_eq!((up, down), (2, 2));
        assert_eq!(
            clock.current_day(),
            NaiveDate::from_ymd_opt(2025, 11, 22).unwrap()
        );
    }

    #[test]
    fn test_force_refresh_pulses_without_day_change() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 8, 0));

        clock.force_refresh();
        assert!(clock.refresh_pulse());
        assert_eq!(events.borrow()[0], DayClockEvent::PulseChanged(true));

        manual.advance(Duration::milliseconds(PULSE_RESET_DELAY_MS));
        clock.poll();
        assert!(!clock.refresh_pulse());
    }

    #[test]
    fn test_backwards_clock_change_is_trusted() {
        let (mut clock, manual, _events) = recording_clock(local(2025, 11, 20, 0, 30));

        manual.advance(-Duration::hours(1));
        clock.day_boundary_crossed();

        assert_eq!(
            clock.current_day(),
            NaiveDate::from_ymd_opt(2025, 11, 19).unwrap()
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let manual = ManualClock::at(local(2025, 11, 20, 23, 59));
        let mut clock = DayClock::with_clock(manual.clone());

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = clock.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        clock.unsubscribe(id);

        manual.advance(Duration::minutes(2));
        clock.day_boundary_crossed();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let (mut clock, manual, events) = recording_clock(local(2025, 11, 20, 23, 59));

        manual.advance(Duration::minutes(2));
        clock.day_boundary_crossed();
        let delivered = events.borrow().len();

        clock.shutdown();
        assert!(!clock.refresh_pulse());

        manual.advance(Duration::days(1));
        clock.day_boundary_crossed();
        clock.poll();
        assert_eq!(events.borrow().len(), delivered);
    }
}
