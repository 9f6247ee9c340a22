use std::io::Write;

use log::debug;

use super::{read_ticks, Timer};

/// Running average of how far past a tick deadline a busy-wait lands.
///
/// A sample more than twice a nonzero current average is counted as an
/// outlier (preemption, migration, interrupt) and kept out of the average.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrunAverage {
    total: u64,
    counted: u64,
    discarded: u64,
}

impl OverrunAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, overrun: u64) {
        // overrun > 2 * total / counted, without truncating the average.
        let outlier = self.total > 0
            && overrun as u128 * self.counted as u128 > 2 * self.total as u128;

        if outlier {
            self.discarded += 1;
        } else {
            self.total += overrun;
            self.counted += 1;
        }
    }

    /// Zero until the first sample is recorded.
    pub fn average(&self) -> u64 {
        if self.counted == 0 {
            0
        } else {
            self.total / self.counted
        }
    }

    pub fn counted(&self) -> u64 {
        self.counted
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

/// Spin `wait_ticks` past each start, `loops` times, and average how late the
/// stop reading lands. The timer is left stopped on the last loop.
pub fn busy_wait_overruns<W: Write>(timer: &mut Timer<W>, wait_ticks: u64, loops: u64) -> OverrunAverage {
    let mut overruns = OverrunAverage::new();

    for _ in 0..loops {
        let deadline = timer.start("BUSY-WAIT-START").start_ticks().saturating_add(wait_ticks);

        while read_ticks() < deadline {}

        timer.stop("BUSY-WAIT-STOP");
        overruns.record(timer.stop_ticks().saturating_sub(deadline));
    }

    debug!(
        "{}: overrun average {} ticks over {} loops ({} discarded)",
        timer.name(), overruns.average(), overruns.counted(), overruns.discarded()
    );

    overruns
}
