/// Round setup consumed at orchestrator construction.
#[derive(Debug, Clone)]
pub struct DuelSettings {
    pub num_competitors: usize,
    pub time_limit_ms: u64,
}

impl Default for DuelSettings {
    fn default() -> Self {
        Self {
            num_competitors: 2,
            time_limit_ms: 120_000,
        }
    }
}

/// Where a competitor's moves come from. Chosen once at construction; the
/// core never branches on it, only the input adapter does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Keyboard-emulated sensor (the cubing debug-keyboard layout).
    #[default]
    Keyboard,
    /// A paired hardware move sensor, delivered by an external adapter.
    Sensor,
}

/// Default distinct-key policy: competitor `i` ends its turn with the digit
/// key `1 + i`.
pub fn default_trigger(index: usize) -> char {
    char::from_digit((index as u32 + 1) % 10, 10).unwrap_or('0')
}
