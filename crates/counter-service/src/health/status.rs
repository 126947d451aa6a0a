use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Process lifecycle state. Only moves forward: Starting -> Running -> ShuttingDown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ServerStatus {
    Starting = 0,
    Running = 1,
    ShuttingDown = 2,
}

impl ServerStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ServerStatus::Starting,
            1 => ServerStatus::Running,
            _ => ServerStatus::ShuttingDown,
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServerStatus::Starting => "starting",
            ServerStatus::Running => "running",
            ServerStatus::ShuttingDown => "shutting down",
        })
    }
}

/// Shared status, written by the lifecycle coordinator and read by health checks.
#[derive(Debug)]
pub struct StatusCell(AtomicU8);

impl Default for StatusCell {
    fn default() -> Self {
        Self(AtomicU8::new(ServerStatus::Starting as u8))
    }
}

impl StatusCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ServerStatus {
        ServerStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move to `next`. Returns false (and changes nothing) if that would go backwards
    /// or stay in place.
    pub fn advance(&self, next: ServerStatus) -> bool {
        let next = next as u8;
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| (next > cur).then_some(next))
            .is_ok()
    }
}
