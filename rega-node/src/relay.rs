use tracing::info;

/// The irrigation actuator: idempotent, no acknowledgement.
///
/// Driven low at startup and on shutdown so the relay is never left in
/// an undefined state across partial failures.
pub trait Relay: Send {
    fn set_irrigation(&mut self, on: bool);
}

/// Relay stand-in that logs transitions.
pub struct LogRelay {
    on: bool,
}

impl LogRelay {
    pub fn new() -> Self {
        info!(on = false, "Irrigation relay initialized");
        Self { on: false }
    }
}

impl Default for LogRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Relay for LogRelay {
    fn set_irrigation(&mut self, on: bool) {
        if on != self.on {
            info!(on, "Irrigation relay switched");
        }
        self.on = on;
    }
}
