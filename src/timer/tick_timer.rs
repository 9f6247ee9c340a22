use std::fmt;
use std::io::{Stdout, Write};
use std::time::Duration;

use log::{error, trace, warn};

use super::clock::{self, Timestamp};
use super::options::TimerOptions;
use super::status::TimerStatus;
use super::ticks::{read_ticks, read_ticks_ordered};

pub const DEFAULT_NAME: &str = "Timer";
const START_LABEL_SUFFIX: &str = "-CTOR-START";
const STOP_LABEL_SUFFIX: &str = "-DTOR-STOP";

/// Cycle-counter timer with a wall-clock shadow.
///
/// Moves through `INACTIVE -> STARTED -> STOPPED -> REPORTED` and may be
/// restarted from `STOPPED` or `REPORTED`. An out-of-order call is a no-op
/// that writes one `ERROR` line to the sink. Nothing here panics or returns
/// an error, so it is safe to wrap around hot paths.
///
/// The sink is any [`Write`]; pass `&mut buf` to keep ownership outside the
/// timer. Dropping a timer that is still running stops and reports it.
pub struct Timer<W: Write = Stdout> {
    name: String,
    status: TimerStatus,
    start_label: String,
    stop_label: String,
    start_ticks: u64,
    stop_ticks: u64,
    start_timestamp: Timestamp,
    stop_timestamp: Timestamp,
    options: TimerOptions,
    sink: W,
}

impl Timer<Stdout> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sink(name, std::io::stdout())
    }
}

impl Default for Timer<Stdout> {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl<W: Write> Timer<W> {
    pub fn with_sink(name: impl Into<String>, sink: W) -> Self {
        Self::with_options(name, sink, TimerOptions::default())
    }

    pub fn with_options(name: impl Into<String>, sink: W, options: TimerOptions) -> Self {
        let name = name.into();

        Self {
            start_label: format!("{}{}", name, START_LABEL_SUFFIX),
            stop_label: format!("{}{}", name, STOP_LABEL_SUFFIX),
            name,
            status: TimerStatus::Inactive,
            start_ticks: 0,
            stop_ticks: 0,
            start_timestamp: Timestamp::default(),
            stop_timestamp: Timestamp::default(),
            options,
            sink,
        }
    }

    /// Begin a measurement. An empty label selects `<name>-CTOR-START`.
    ///
    /// Rejected while already started; the running measurement is kept.
    #[inline]
    pub fn start(&mut self, label: &str) -> &mut Self {
        if self.status == TimerStatus::Started {
            self.reject(label, "start() called but timer is already started");
            return self;
        }

        self.start_label = if label.is_empty() {
            format!("{}{}", self.name, START_LABEL_SUFFIX)
        } else {
            label.to_owned()
        };
        trace!("{}: {} -> {} at {}", self.name, self.status, TimerStatus::Started, self.start_label);
        self.status = TimerStatus::Started;

        // Tick read goes last so it sits right next to the measured code.
        self.start_timestamp = self.capture_timestamp();
        self.start_ticks = read_ticks();
        self
    }

    /// End the running measurement. Rejected unless started.
    #[inline]
    pub fn stop(&mut self, label: &str) -> &mut Self {
        if self.status != TimerStatus::Started {
            self.reject(label, "stop() called but timer is not started");
            return self;
        }

        // Ordered read: the measured code has retired before the bracket closes.
        let ticks = read_ticks_ordered();
        let timestamp = self.capture_timestamp();
        self.finish(ticks, timestamp, label.to_owned());
        self
    }

    /// Write the measurement to the sink. Rejected unless stopped.
    pub fn report(&mut self) -> &mut Self {
        if self.status != TimerStatus::Stopped {
            let status = self.status.name();
            self.reject(status, "report() called but timer is not stopped");
            return self;
        }

        let line = self.report_line();
        self.emit(&line);
        trace!("{}: {} -> {}", self.name, self.status, TimerStatus::Reported);
        self.status = TimerStatus::Reported;
        self
    }

    pub fn stop_and_report(&mut self, label: &str) -> &mut Self {
        self.stop(label).report()
    }

    /// Time `func` between `start_label` and `stop_label`, then report.
    ///
    /// Whatever `func` returns is dropped.
    pub fn profile<F, T>(&mut self, start_label: &str, stop_label: &str, func: F) -> &mut Self
    where
        F: FnOnce() -> T,
    {
        self.start(start_label);
        let _ = func();
        self.stop(stop_label).report()
    }

    /// Ticks since start, while running. Zero otherwise.
    #[inline]
    pub fn lapsed_ticks(&self) -> u64 {
        if self.status == TimerStatus::Started {
            read_ticks().saturating_sub(self.start_ticks)
        } else {
            0
        }
    }

    /// Ticks between start and stop. Zero until stopped.
    pub fn stop_lapsed_ticks(&self) -> u64 {
        if self.status.has_measurement() {
            self.stop_ticks.saturating_sub(self.start_ticks)
        } else {
            0
        }
    }

    /// Wall-clock time between start and stop. Zero until stopped, or when
    /// the wall clock is disabled.
    pub fn stop_lapsed(&self) -> Duration {
        if self.status.has_measurement() && self.options.wall_clock {
            self.stop_timestamp - self.start_timestamp
        } else {
            Duration::ZERO
        }
    }

    pub fn stop_lapsed_secs(&self) -> f64 {
        self.stop_lapsed().as_secs_f64()
    }

    pub fn stop_lapsed_millis(&self) -> u64 {
        self.stop_lapsed().as_millis() as u64
    }

    pub fn stop_lapsed_micros(&self) -> u64 {
        self.stop_lapsed().as_micros() as u64
    }

    pub fn stop_lapsed_nanos(&self) -> u64 {
        self.stop_lapsed().as_nanos() as u64
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn status_name(&self) -> &'static str {
        self.status.name()
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn stop_label(&self) -> &str {
        &self.stop_label
    }

    pub fn start_ticks(&self) -> u64 {
        self.start_ticks
    }

    pub fn stop_ticks(&self) -> u64 {
        self.stop_ticks
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.start_timestamp
    }

    pub fn stop_timestamp(&self) -> Timestamp {
        self.stop_timestamp
    }

    pub fn wall_clock_enabled(&self) -> bool {
        self.options.wall_clock
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    #[inline]
    fn capture_timestamp(&self) -> Timestamp {
        if self.options.wall_clock {
            clock::now()
        } else {
            Timestamp::default()
        }
    }

    fn finish(&mut self, ticks: u64, timestamp: Timestamp, label: String) {
        self.stop_ticks = ticks;
        self.stop_timestamp = timestamp;
        self.stop_label = label;
        trace!("{}: {} -> {} at {}", self.name, self.status, TimerStatus::Stopped, self.stop_label);
        self.status = TimerStatus::Stopped;
    }

    fn report_line(&self) -> String {
        let mut line = format!(
            "{}: {} -> {}: Timer started at {} and stopped at {} taking {} ticks",
            self.name, self.start_label, self.stop_label,
            self.start_ticks, self.stop_ticks, self.stop_lapsed_ticks(),
        );

        if self.options.wall_clock {
            line.push_str(&format!(
                " - {:.9} sec [{} msec, {} usec, {} nsec]",
                self.stop_lapsed_secs(),
                self.stop_lapsed_millis(),
                self.stop_lapsed_micros(),
                self.stop_lapsed_nanos(),
            ));
        }

        line
    }

    fn reject(&mut self, label: &str, message: &str) {
        let line = format!("{}: {}: ERROR: {}", self.name, label, message);
        error!("{}", line);
        self.emit(&line);
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.sink, "{}", line) {
            warn!("{}: failed to write to sink: {}", self.name, e);
        }
    }
}

impl<W: Write> Drop for Timer<W> {
    fn drop(&mut self) {
        // Read first so the bookkeeping below stays out of the measurement.
        let ticks = read_ticks_ordered();
        let timestamp = self.capture_timestamp();

        match self.status {
            TimerStatus::Inactive | TimerStatus::Reported => return,
            TimerStatus::Started => {
                let label = format!("{}{}", self.name, STOP_LABEL_SUFFIX);
                self.finish(ticks, timestamp, label);
            }
            TimerStatus::Stopped => {}
        }

        self.report();
    }
}

impl<W: Write> fmt::Display for Timer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timer {}", self.name)?;
        writeln!(f, "  status:          {}", self.status)?;
        writeln!(f, "  start label:     {}", self.start_label)?;
        writeln!(f, "  stop label:      {}", self.stop_label)?;
        writeln!(f, "  start ticks:     {}", self.start_ticks)?;
        writeln!(f, "  stop ticks:      {}", self.stop_ticks)?;
        writeln!(f, "  start timestamp: {}", self.start_timestamp)?;
        writeln!(f, "  stop timestamp:  {}", self.stop_timestamp)?;
        write!(f, "  wall clock:      {}", if self.options.wall_clock { "enabled" } else { "disabled" })
    }
}

impl<W: Write> fmt::Debug for Timer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("start_label", &self.start_label)
            .field("stop_label", &self.stop_label)
            .field("start_ticks", &self.start_ticks)
            .field("stop_ticks", &self.stop_ticks)
            .field("start_timestamp", &self.start_timestamp)
            .field("stop_timestamp", &self.stop_timestamp)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
