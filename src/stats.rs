// Formatting rules adapted from timer.cubing.net.

/// A formatted time split for styled rendering: the leading "1" of
/// teens-seconds is carried separately so a display can de-emphasize it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParts {
    pub sec_first: String,
    pub sec_rest: String,
    pub deciseconds: u64,
}

fn pad(value: u64, digits: usize) -> String {
    format!("{value:0digits$}")
}

pub fn time_parts(ms: u64) -> TimeParts {
    let hours = ms / (60 * 60 * 1000);
    let minutes = (ms / (60 * 1000)) % 60;
    let seconds = (ms / 1000) % 60;

    let mut sec_first = String::new();
    let sec_rest = if hours > 0 {
        format!("{}:{}:{}", pad(hours, 2), pad(minutes, 2), pad(seconds, 2))
    } else if minutes > 0 {
        format!("{}:{}", minutes, pad(seconds, 2))
    } else {
        let mut s = seconds.to_string();
        if s.starts_with('1') {
            sec_first = "1".to_string();
            s.remove(0);
        }
        s
    };

    TimeParts {
        sec_first,
        sec_rest,
        deciseconds: (ms % 1000) / 100,
    }
}

/// Remaining-time display: `M:SS.d` below an hour, `H:MM:SS.d` at or above,
/// bare `0` for an exhausted budget.
pub fn format_time(ms: u64) -> String {
    if ms == 0 {
        return "0".to_string();
    }
    let parts = time_parts(ms);
    format!(
        "{}{}.{}",
        parts.sec_first, parts.sec_rest, parts.deciseconds
    )
}

/// `---` when no time applies (competitor without a round).
pub fn format_time_opt(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => format_time(ms),
        None => "---".to_string(),
    }
}
