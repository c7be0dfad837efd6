//! Application-level configuration constants.

// Countdown
pub const TARGET_INSTANT: &str = "2027-01-01T00:00:00+00:00";
pub const TICK_INTERVAL_MS: u32 = 1_000;

// Element ids the page is expected to provide
pub const DAYS_ID: &str = "days";
pub const HOURS_ID: &str = "hours";
pub const MINUTES_ID: &str = "minutes";
pub const SECONDS_ID: &str = "seconds";
pub const CELEBRATION_ID: &str = "celebration";
pub const PARTICLES_ID: &str = "particles";

// CSS hooks
pub const PULSE_CLASS: &str = "tick";
pub const VISIBLE_CLASS: &str = "visible";
pub const PARTICLE_CLASS: &str = "particle";

// Celebration particles: count and sampling ranges (half-open)
pub const PARTICLE_COUNT: usize = 40;
pub const PARTICLE_SIZE_PX: (f64, f64) = (4.0, 12.0);
pub const PARTICLE_LEFT_PCT: (f64, f64) = (0.0, 100.0);
pub const PARTICLE_TOP_PCT: (f64, f64) = (0.0, 100.0);
pub const PARTICLE_DURATION_S: (f64, f64) = (3.0, 8.0);
pub const PARTICLE_DELAY_S: (f64, f64) = (0.0, 4.0);

// Offline cache
pub const CACHE_VERSION: &str = "countdown-v1";
pub const OFFLINE_SHELL: &str = "/";
pub const FONT_HOSTS: &[&str] = &["fonts.googleapis.com", "fonts.gstatic.com"];

// Logging
pub const LOG_LEVEL: log::Level = log::Level::Info;
