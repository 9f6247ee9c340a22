mod clock;
mod options;
mod overrun;
mod status;
mod tick_timer;
mod ticks;

pub use clock::{now, Timestamp};
pub use options::{TimerOptions, WALL_CLOCK_ENV};
pub use overrun::{busy_wait_overruns, OverrunAverage};
pub use status::{status_name, TimerStatus, STATUS_NAMES};
pub use tick_timer::{Timer, DEFAULT_NAME};
pub use ticks::{read_ticks, read_ticks_ordered};

/// Time a block: start, run it, stop, report. Evaluates to the block's value.
///
/// ```
/// let mut buf = Vec::new();
/// let mut timer = tick_timer::Timer::with_sink("sum", &mut buf);
/// let total = tick_timer::profile!(timer, "SUM-START", "SUM-STOP", {
///     (1..=100u64).sum::<u64>()
/// });
/// assert_eq!(total, 5050);
/// ```
#[macro_export]
macro_rules! profile {
    ($timer:expr, $start:expr, $stop:expr, $body:block) => {{
        $timer.start($start);
        let result = $body;
        $timer.stop($stop).report();
        result
    }};
}
