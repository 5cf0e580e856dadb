//! Period selection: window length per period kind, clamped window start,
//! and the derived `[start, end]` run range.
//!
//! All functions are pure. [`Period`] is the one mutable selection value a
//! front end owns; every mutation re-clamps the start so the window never
//! leaves `1..=max_run`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 4] = [
        PeriodKind::Day,
        PeriodKind::Week,
        PeriodKind::Month,
        PeriodKind::Quarter,
    ];

    /// Window length in runs.
    pub fn length(self) -> u32 {
        match self {
            PeriodKind::Day => 1,
            PeriodKind::Week => 7,
            PeriodKind::Month => 30,
            PeriodKind::Quarter => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Quarter => "quarter",
        }
    }

    /// Exact lowercase name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        PeriodKind::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Unrecognized names, including other casings, select `Day`.
    pub fn from_name_or_day(name: &str) -> Self {
        PeriodKind::from_name(name).unwrap_or_else(|| {
            warn!(period = name, "unrecognized period, using day");
            PeriodKind::Day
        })
    }
}

/// Command-line parsing; trims and ignores case.
impl FromStr for PeriodKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PeriodKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown period: {}", s)))
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window length for a period name; unrecognized names have length 1.
pub fn period_length(kind: &str) -> u32 {
    PeriodKind::from_name(kind).map_or(1, PeriodKind::length)
}

/// `min(max(start, 1), max_run - length + 1)`.
///
/// When `length > max_run` no start fits; the result degenerates to 1 and
/// the caller is expected to have rejected that configuration already.
pub fn clamp_window_start(start: i64, length: u32, max_run: u32) -> u32 {
    let max_start = i64::from(max_run) - i64::from(length) + 1;
    let clamped = start.max(1).min(max_start).max(1);
    u32::try_from(clamped).unwrap_or(1)
}

/// Inclusive run range `[start, start + length - 1]`.
pub fn window_bounds(start: u32, length: u32) -> Window {
    Window {
        start,
        end: start.saturating_add(length.max(1) - 1),
    }
}

/// Inclusive run-index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub fn contains(&self, run: u32) -> bool {
        self.start <= run && run <= self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Current period kind and window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    kind: PeriodKind,
    window_start: u32,
    max_run: u32,
}

impl Period {
    pub fn new(kind: PeriodKind, window_start: i64, max_run: u32) -> AppResult<Self> {
        if max_run == 0 {
            return Err(AppError::InvalidInput(
                "max_run must be at least 1".to_string(),
            ));
        }
        if kind.length() > max_run {
            return Err(AppError::InvalidInput(format!(
                "{} period needs {} runs but only {} are available",
                kind,
                kind.length(),
                max_run
            )));
        }
        Ok(Self {
            kind,
            window_start: clamp_window_start(window_start, kind.length(), max_run),
            max_run,
        })
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn window_start(&self) -> u32 {
        self.window_start
    }

    pub fn max_run(&self) -> u32 {
        self.max_run
    }

    pub fn length(&self) -> u32 {
        self.kind.length()
    }

    /// Largest valid window start for the current kind.
    pub fn max_start(&self) -> u32 {
        clamp_window_start(i64::from(self.max_run), self.length(), self.max_run)
    }

    pub fn window(&self) -> Window {
        window_bounds(self.window_start, self.length())
    }

    pub fn set_kind(&mut self, kind: PeriodKind) -> AppResult<()> {
        *self = Period::new(kind, i64::from(self.window_start), self.max_run)?;
        debug!(period = %kind, start = self.window_start, "period kind changed");
        Ok(())
    }

    pub fn set_window_start(&mut self, start: i64) {
        self.window_start = clamp_window_start(start, self.length(), self.max_run);
        debug!(start = self.window_start, "window start changed");
    }

    /// Move one window length back, stopping at run 1.
    pub fn step_back(&mut self) {
        self.set_window_start(i64::from(self.window_start) - i64::from(self.length()));
    }

    /// Move one window length forward, stopping at the last valid start.
    pub fn step_forward(&mut self) {
        self.set_window_start(i64::from(self.window_start) + i64::from(self.length()));
    }

    /// Start the window on a clicked calendar day.
    pub fn select_day(&mut self, day: u32) {
        self.set_window_start(i64::from(day));
    }

    /// Human-readable range, e.g. "Showing weekly data: days 94 - 100".
    pub fn describe(&self) -> String {
        let w = self.window();
        match self.kind {
            PeriodKind::Day => format!("Showing data for day {}", w.start),
            PeriodKind::Week => format!("Showing weekly data: days {} - {}", w.start, w.end),
            PeriodKind::Month => format!("Showing monthly data: days {} - {}", w.start, w.end),
            PeriodKind::Quarter => {
                format!("Showing quarterly data: days {} - {}", w.start, w.end)
            }
        }
    }
}
