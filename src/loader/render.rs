//! Mapping from slot state to what a row displays

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, Interval, MissedTickBehavior};

use super::slot::FetchState;
use crate::network::NetworkData;

/// Glyph shown while a row has nothing to display
pub const SPINNER_GLYPH: &str = "⟳";

/// Inputs shared by every row at render time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Wall-clock unix seconds
    pub now: u64,
    /// Effective network, used for detail paths and explorer links
    pub network: Option<&'static NetworkData>,
}

impl RenderContext {
    pub fn new(now: u64, network: Option<&'static NetworkData>) -> Self {
        Self { now, network }
    }

    /// Context stamped with the current wall-clock time
    pub fn current(network: Option<&'static NetworkData>) -> Self {
        Self::new(unix_now(), network)
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.network.map(|network| network.chain_id)
    }
}

/// A record that knows how to build its populated view
pub trait RenderRecord {
    type View: Clone + PartialEq + fmt::Debug;

    fn render(&self, ctx: &RenderContext) -> Self::View;
}

/// What a row displays
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel<T> {
    Placeholder,
    Populated(T),
    Error(String),
}

impl<T> ViewModel<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ViewModel::Placeholder)
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            ViewModel::Populated(view) => Some(view),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ViewModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewModel::Placeholder => write!(f, "{}", SPINNER_GLYPH),
            ViewModel::Populated(view) => write!(f, "{}", view),
            ViewModel::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Render a slot state. Pure: equal inputs give equal views.
pub fn render<R: RenderRecord>(state: &FetchState<R>, ctx: &RenderContext) -> ViewModel<R::View> {
    match state {
        FetchState::Empty | FetchState::Loading => ViewModel::Placeholder,
        FetchState::Ready(record) => ViewModel::Populated(record.render(ctx)),
        FetchState::Failed(message) => ViewModel::Error(message.clone()),
    }
}

/// Time left until a target timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// `None` once `target` has been reached
    pub fn until(now: u64, target: u64) -> Option<Self> {
        if target <= now {
            return None;
        }
        Some(Self::from_secs(target - now))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self {
            days: secs / 86_400,
            hours: (secs % 86_400) / 3_600,
            minutes: (secs % 3_600) / 60,
            seconds: secs % 60,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    /// `DD:HH:MM:SS`
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clock())
    }
}

const UNITS: [(&str, u64); 7] = [
    ("y", 31_557_600),
    ("mo", 2_629_800),
    ("w", 604_800),
    ("d", 86_400),
    ("h", 3_600),
    ("m", 60),
    ("s", 1),
];

/// Short human duration using only the largest fitting unit, rounded
pub fn humanize_short(secs: u64) -> String {
    for (label, size) in UNITS {
        if secs >= size {
            let rounded = (secs + size / 2) / size;
            return format!("{}{}", rounded, label);
        }
    }
    "0s".to_string()
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Row-local ticking clock for time-dependent fields
pub struct RowTicker {
    interval: Interval,
}

impl RowTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Wait for the next tick and return the wall-clock time
    pub async fn tick(&mut self) -> u64 {
        self.interval.tick().await;
        unix_now()
    }
}
