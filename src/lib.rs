use chrono::DateTime;
use log::{debug, info};
use rand::Rng;

pub mod celebration;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod offline;
pub mod sw;

use celebration::{Celebration, Particle};
use error::CountdownError;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// One of the four on-screen counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Days, Field::Hours, Field::Minutes, Field::Seconds];

    pub fn element_id(self) -> &'static str {
        match self {
            Field::Days => config::DAYS_ID,
            Field::Hours => config::HOURS_ID,
            Field::Minutes => config::MINUTES_ID,
            Field::Seconds => config::SECONDS_ID,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Time left until the target, split into whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Floor-divide a positive millisecond delta. Returns `None` once the
    /// delta is zero or negative.
    pub fn from_millis(ms: i64) -> Option<Self> {
        if ms <= 0 {
            return None;
        }
        Some(Remaining {
            days: (ms / MS_PER_DAY) as u64,
            hours: ((ms % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((ms % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((ms % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        })
    }

    /// Display text for a field: days unpadded, the rest two digits wide.
    pub fn text(&self, field: Field) -> String {
        match field {
            Field::Days => self.days.to_string(),
            Field::Hours => format!("{:02}", self.hours),
            Field::Minutes => format!("{:02}", self.minutes),
            Field::Seconds => format!("{:02}", self.seconds),
        }
    }

    pub fn texts(&self) -> [String; 4] {
        Field::ALL.map(|field| self.text(field))
    }
}

/// The fixed instant being counted down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target_ms: i64,
}

impl Countdown {
    pub fn from_rfc3339(input: &str) -> Result<Self, CountdownError> {
        let target =
            DateTime::parse_from_rfc3339(input).map_err(|source| CountdownError::InvalidTarget {
                input: input.to_string(),
                source,
            })?;
        Ok(Self::from_millis(target.timestamp_millis()))
    }

    pub fn from_millis(target_ms: i64) -> Self {
        Countdown { target_ms }
    }

    pub fn remaining_at(&self, now_ms: i64) -> Option<Remaining> {
        Remaining::from_millis(self.target_ms.saturating_sub(now_ms))
    }
}

/// Render surface for the countdown.
pub trait Display {
    /// Replace the text of `field`. `pulse` requests the change animation.
    fn write_field(&mut self, field: Field, text: &str, pulse: bool);

    /// Show the celebration with its particles. Called at most once.
    fn celebrate(&mut self, particles: &[Particle]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Finished,
}

/// Owns the previously rendered text of every field and the celebration state.
pub struct Renderer<D: Display> {
    countdown: Countdown,
    display: D,
    previous: [Option<String>; 4],
    celebration: Celebration,
    finished: bool,
}

impl<D: Display> Renderer<D> {
    pub fn new(countdown: Countdown, display: D) -> Self {
        Renderer {
            countdown,
            display,
            previous: Default::default(),
            celebration: Celebration::new(),
            finished: false,
        }
    }

    /// Run one tick at `now_ms` (milliseconds since the Unix epoch).
    ///
    /// Once the target has passed the zero state is rendered a single time
    /// and every later call is a no-op returning [`Tick::Finished`].
    pub fn tick<R: Rng + ?Sized>(&mut self, now_ms: i64, rng: &mut R) -> Tick {
        if self.finished {
            return Tick::Finished;
        }

        match self.countdown.remaining_at(now_ms) {
            Some(remaining) => {
                self.render(&remaining);
                Tick::Running
            }
            None => {
                info!("Countdown reached its target");
                self.render(&Remaining::ZERO);
                self.finished = true;
                self.celebrate(rng);
                Tick::Finished
            }
        }
    }

    fn render(&mut self, remaining: &Remaining) {
        for (field, text) in Field::ALL.into_iter().zip(remaining.texts()) {
            let slot = &mut self.previous[field.index()];
            if slot.as_deref() == Some(text.as_str()) {
                continue;
            }
            let pulse = slot.is_some();
            self.display.write_field(field, &text, pulse);
            *slot = Some(text);
        }
    }

    /// Switch to the celebration state. Safe to call repeatedly.
    pub fn celebrate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.celebration.trigger(rng) {
            Some(particles) => self.display.celebrate(particles),
            None => debug!("Celebration already shown"),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn previous(&self, field: Field) -> Option<&str> {
        self.previous[field.index()].as_deref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
