use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Which time columns to print at a line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampFlags {
    /// Wall-clock time as nanoseconds since the Unix epoch.
    pub absolute: bool,
    pub delta_ns: bool,
    pub delta_sec: bool,
}

impl TimestampFlags {
    pub fn any(&self) -> bool {
        self.absolute || self.delta_ns || self.delta_sec
    }
}

/// Remembers when the previous line boundary was printed.
#[derive(Debug, Default)]
pub struct TimestampTracker {
    last: Option<Duration>,
}

impl TimestampTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the requested time columns and move the mark to now.
    pub fn mark_and_report(&mut self, flags: TimestampFlags) -> String {
        self.mark_at(SystemTime::now(), flags)
    }

    fn mark_at(&mut self, now: SystemTime, flags: TimestampFlags) -> String {
        // A clock set before 1970 is treated as the epoch itself.
        let now = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let prior = *self.last.get_or_insert(now);
        // Duration keeps nanos in 0..1e9, borrowing from the seconds as needed.
        // A clock stepped backwards reports no elapsed time.
        let delta = now.checked_sub(prior).unwrap_or_default();

        let mut prefix = String::new();
        if flags.absolute {
            prefix.push_str(&format!("{}: ", now.as_nanos()));
        }
        if flags.delta_ns {
            prefix.push_str(&format!("+{:012}: ", delta.as_nanos()));
        }
        if flags.delta_sec {
            prefix.push_str(&format!("{:.6}: ", delta.as_secs_f64()));
        }

        self.last = Some(now);
        prefix
    }
}
