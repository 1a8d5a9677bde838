use courtside_api::TimerSnapshot;

// ---------------------------------------------------------------------------
// Local match clock, reconciled against authoritative backend snapshots
// ---------------------------------------------------------------------------

/// Flag snapshot from the latest authoritative reading. Tracked alongside
/// the numeric state so a state transition (running → paused, break starts)
/// snaps the board immediately instead of coasting on stale local time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockFlags {
    pub is_running: bool,
    pub is_halftime_break: bool,
    pub is_extra_time: bool,
}

impl ClockFlags {
    pub fn from_snapshot(snapshot: Option<&TimerSnapshot>) -> Self {
        match snapshot {
            Some(s) => Self {
                is_running: s.is_running,
                is_halftime_break: s.is_halftime_break,
                is_extra_time: s.is_extra_time,
            },
            None => Self::default(),
        }
    }

    /// True while the one-second tick schedule should be active.
    pub fn is_live(&self) -> bool {
        self.is_running || self.is_halftime_break
    }
}

/// Locally advanced view of match time, in whole non-negative seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalClock {
    pub remaining_seconds: u32,
    pub extra_elapsed_seconds: u32,
    pub halftime_pause_remaining: u32,
}

impl LocalClock {
    /// Snapshot normalizer: clamp the backend's possibly-absent,
    /// possibly-fractional, possibly-negative fields into canonical whole
    /// seconds. Malformed input degrades to zeros, never to an error.
    pub fn normalize(snapshot: Option<&TimerSnapshot>) -> Self {
        let clamp = |v: Option<f64>| v.unwrap_or(0.0).trunc().max(0.0) as u32;
        match snapshot {
            None => Self::default(),
            Some(s) => Self {
                remaining_seconds: clamp(s.remaining_seconds),
                extra_elapsed_seconds: clamp(s.extra_elapsed_seconds),
                halftime_pause_remaining: clamp(s.halftime_pause_remaining),
            },
        }
    }
}

/// The board's match clock: ticks locally once per second between
/// authoritative snapshots, and resynchronizes when a snapshot disagrees
/// beyond poll jitter or flips a state flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchClock {
    local: LocalClock,
    flags: ClockFlags,
}

impl MatchClock {
    /// Read-only view for the rendering layer.
    pub fn current(&self) -> LocalClock {
        self.local
    }

    pub fn flags(&self) -> ClockFlags {
        self.flags
    }

    /// Drift detector: fold a new authoritative snapshot into the clock.
    /// Resyncs (adopting the normalized snapshot wholesale) when any of
    /// these hold, checked in order:
    ///   1. no snapshot exists, or the match is neither running nor on break;
    ///   2. any state flag changed since the last observation;
    ///   3. any field drifted beyond tolerance (1 s while live, 0 s idle).
    /// Otherwise local ticking continues uninterrupted, which keeps ±1 s of
    /// poll jitter from visibly jumping the board.
    /// Returns true when a resync happened.
    pub fn observe(&mut self, snapshot: Option<&TimerSnapshot>) -> bool {
        let authoritative = LocalClock::normalize(snapshot);
        let new_flags = ClockFlags::from_snapshot(snapshot);

        let resync = snapshot.is_none()
            || !new_flags.is_live()
            || new_flags != self.flags
            || drift_exceeded(self.local, authoritative, new_flags);

        if resync {
            self.local = authoritative;
        }
        self.flags = new_flags;
        resync
    }

    /// Local ticker: advance by exactly one second of wall-clock time.
    /// Only the running clock and the break countdown move; extra-time
    /// elapsed grows only while running in an extra period. Everything
    /// saturates at zero.
    pub fn tick(&mut self) {
        if self.flags.is_running {
            self.local.remaining_seconds = self.local.remaining_seconds.saturating_sub(1);
            if self.flags.is_extra_time {
                self.local.extra_elapsed_seconds =
                    self.local.extra_elapsed_seconds.saturating_add(1);
            }
        }
        if self.flags.is_halftime_break {
            self.local.halftime_pause_remaining =
                self.local.halftime_pause_remaining.saturating_sub(1);
        }
    }
}

fn drift_exceeded(local: LocalClock, authoritative: LocalClock, flags: ClockFlags) -> bool {
    // An idle clock has no meaningful drift to absorb, hence zero tolerance.
    let tolerance = if flags.is_live() { 1 } else { 0 };
    local.remaining_seconds.abs_diff(authoritative.remaining_seconds) > tolerance
        || local
            .extra_elapsed_seconds
            .abs_diff(authoritative.extra_elapsed_seconds)
            > tolerance
        || local
            .halftime_pause_remaining
            .abs_diff(authoritative.halftime_pause_remaining)
            > tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        remaining: f64,
        extra: f64,
        pause: f64,
        running: bool,
        halftime: bool,
        extra_time: bool,
    ) -> TimerSnapshot {
        TimerSnapshot {
            remaining_seconds: Some(remaining),
            extra_elapsed_seconds: Some(extra),
            halftime_pause_remaining: Some(pause),
            is_running: running,
            is_halftime_break: halftime,
            is_extra_time: extra_time,
        }
    }

    #[test]
    fn normalize_truncates_fractions_and_clamps_negatives() {
        let s = snapshot(431.7, -3.2, 0.9, true, false, false);
        let clock = LocalClock::normalize(Some(&s));
        assert_eq!(clock.remaining_seconds, 431);
        assert_eq!(clock.extra_elapsed_seconds, 0);
        assert_eq!(clock.halftime_pause_remaining, 0);
    }

    #[test]
    fn normalize_missing_fields_degrade_to_zero() {
        let s = TimerSnapshot {
            is_running: true,
            ..TimerSnapshot::default()
        };
        assert_eq!(LocalClock::normalize(Some(&s)), LocalClock::default());
        assert_eq!(LocalClock::normalize(None), LocalClock::default());
    }

    #[test]
    fn normalize_tolerates_nan() {
        let s = TimerSnapshot {
            remaining_seconds: Some(f64::NAN),
            ..TimerSnapshot::default()
        };
        assert_eq!(LocalClock::normalize(Some(&s)).remaining_seconds, 0);
    }

    #[test]
    fn fields_never_go_negative_across_ticks_and_snapshots() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(1.0, 0.0, 1.0, true, true, false)));
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.current().remaining_seconds, 0);
        assert_eq!(clock.current().halftime_pause_remaining, 0);

        clock.observe(Some(&snapshot(-40.0, -1.0, -2.0, true, false, false)));
        assert_eq!(clock.current(), LocalClock::default());
    }

    #[test]
    fn flag_change_forces_immediate_resync() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(120.0, 0.0, 0.0, true, false, false)));
        assert_eq!(clock.current().remaining_seconds, 120);

        // Pause arrives with a fresher reading; no coasting allowed.
        let resynced = clock.observe(Some(&snapshot(90.0, 0.0, 0.0, false, false, false)));
        assert!(resynced);
        assert_eq!(clock.current().remaining_seconds, 90);
        assert!(!clock.flags().is_running);
    }

    #[test]
    fn one_second_jitter_does_not_overwrite_local_clock() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(120.0, 0.0, 0.0, true, false, false)));

        let resynced = clock.observe(Some(&snapshot(119.0, 0.0, 0.0, true, false, false)));
        assert!(!resynced);
        assert_eq!(clock.current().remaining_seconds, 120);
    }

    #[test]
    fn large_drift_forces_resync() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(120.0, 0.0, 0.0, true, false, false)));

        let resynced = clock.observe(Some(&snapshot(110.0, 0.0, 0.0, true, false, false)));
        assert!(resynced);
        assert_eq!(clock.current().remaining_seconds, 110);
    }

    #[test]
    fn extra_time_accumulates_while_running() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(0.0, 5.0, 0.0, true, false, true)));
        clock.tick();
        assert_eq!(clock.current().remaining_seconds, 0);
        assert_eq!(clock.current().extra_elapsed_seconds, 6);
    }

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(300.0, 0.0, 0.0, false, false, false)));
        let before = clock.current();
        for _ in 0..10 {
            clock.tick();
        }
        assert_eq!(clock.current(), before);
        assert!(!clock.flags().is_live());
    }

    #[test]
    fn absent_snapshot_resets_to_zeroed_idle() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(600.0, 0.0, 0.0, true, false, false)));
        assert!(clock.observe(None));
        assert_eq!(clock.current(), LocalClock::default());
        assert!(!clock.flags().is_live());
    }

    #[test]
    fn three_unanswered_ticks_advance_the_running_clock() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(600.0, 0.0, 0.0, true, false, false)));
        for _ in 0..3 {
            clock.tick();
        }
        let local = clock.current();
        assert_eq!(local.remaining_seconds, 597);
        assert_eq!(local.extra_elapsed_seconds, 0);
        assert_eq!(local.halftime_pause_remaining, 0);
    }

    #[test]
    fn running_to_halftime_transition_snaps_and_ticks_pause_only() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(0.0, 0.0, 0.0, true, false, false)));

        let resynced = clock.observe(Some(&snapshot(0.0, 0.0, 300.0, false, true, false)));
        assert!(resynced);
        assert_eq!(clock.current().halftime_pause_remaining, 300);

        clock.tick();
        clock.tick();
        let local = clock.current();
        assert_eq!(local.halftime_pause_remaining, 298);
        assert_eq!(local.remaining_seconds, 0);
        assert_eq!(local.extra_elapsed_seconds, 0);
    }

    #[test]
    fn break_countdown_tolerates_jitter_too() {
        let mut clock = MatchClock::default();
        clock.observe(Some(&snapshot(0.0, 0.0, 300.0, false, true, false)));
        clock.tick();
        // Poll answers one second behind the local countdown.
        let resynced = clock.observe(Some(&snapshot(0.0, 0.0, 300.0, false, true, false)));
        assert!(!resynced);
        assert_eq!(clock.current().halftime_pause_remaining, 299);
    }
}
