use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum TimerStatus {
    Inactive = 0,
    Started = 1,
    Stopped = 2,
    Reported = 3,
}

/// Display names, indexed by the explicit `TimerStatus` discriminants.
pub static STATUS_NAMES: [(TimerStatus, &str); 4] = [
    (TimerStatus::Inactive, "INACTIVE"),
    (TimerStatus::Started,  "STARTED"),
    (TimerStatus::Stopped,  "STOPPED"),
    (TimerStatus::Reported, "REPORTED"),
];

pub fn status_name(status: TimerStatus) -> &'static str {
    STATUS_NAMES[status as usize].1
}

impl TimerStatus {
    pub fn name(self) -> &'static str {
        status_name(self)
    }

    /// A measurement is held: the stop reading is valid.
    pub fn has_measurement(self) -> bool {
        matches!(self, TimerStatus::Stopped | TimerStatus::Reported)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
