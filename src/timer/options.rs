pub const WALL_CLOCK_ENV: &str = "TICK_TIMER_WALL_CLOCK";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerOptions {
    /// Capture wall-clock timestamps next to the tick reads.
    pub wall_clock: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self { wall_clock: true }
    }
}

impl TimerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wall_clock(mut self, enabled: bool) -> Self {
        self.wall_clock = enabled;
        self
    }

    /// Defaults, overridden by `TICK_TIMER_WALL_CLOCK` when set.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(WALL_CLOCK_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let options = Self::default();

        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "0" | "false" | "off" | "no") => options.wall_clock(false),
            _ => options,
        }
    }
}
