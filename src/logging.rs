//! Logging capability injected into the engines
//!
//! The calculation code never reaches for a global logger. Each engine holds a
//! `SharedLog` handle; binaries use [`LogFacade`] which forwards to the `log`
//! crate (configured by `env_logger`), tests can pass [`Silent`] or capture
//! events with [`MemoryLog`].

use log::Level;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Sink for engine diagnostics
pub trait CalcLog: Send + Sync {
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }
}

/// Shared handle passed to engines
pub type SharedLog = Arc<dyn CalcLog>;

/// Forwards events to the `log` facade under a fixed target
#[derive(Debug, Clone, Copy)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn shared(target: &'static str) -> SharedLog {
        Arc::new(Self::new(target))
    }
}

impl CalcLog for LogFacade {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", args);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Silent {
    pub fn shared() -> SharedLog {
        Arc::new(Silent)
    }
}

impl CalcLog for Silent {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Whether an event at `level` contains `needle`
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }
}

impl CalcLog for MemoryLog {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, args.to_string()));
        }
    }
}
