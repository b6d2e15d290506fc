/// Checks that `text`, once trimmed, falls within the given length bounds.
pub fn validate_text(text: &str, min_len: usize, max_len: usize) -> bool {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    len >= min_len && len <= max_len
}

/// Task titles are 1-100 characters.
pub fn validate_task_text(text: &str) -> bool {
    validate_text(text, 1, 100)
}

/// Memos are optional but capped at 500 characters.
pub fn validate_memo(memo: &str) -> bool {
    memo.chars().count() <= 500
}

/// Durations are whole minutes, 1 through a full day.
pub fn validate_duration(minutes: u32) -> bool {
    (1..=1440).contains(&minutes)
}

/// Checks the `HH:MM` shape with hour 0-23 and minute 0-59.
pub fn validate_time(time: &str) -> bool {
    parse_time(time).is_some()
}

/// A time range is valid when both ends are valid times. An end before
/// the start is allowed and means the interval wraps past midnight.
pub fn validate_time_range(start: &str, end: &str) -> bool {
    validate_time(start) && validate_time(end)
}

/// Parses `HH:MM` into (hour, minute). Both components must be exactly
/// two digits.
pub fn parse_time(time: &str) -> Option<(u32, u32)> {
    let (h, m) = time.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour <= 23 && minute <= 59 {
        Some((hour, minute))
    } else {
        None
    }
}

/// Converts `HH:MM` to minutes since midnight. Returns `None` for
/// malformed input.
pub fn time_to_minutes(time: &str) -> Option<u32> {
    parse_time(time).map(|(h, m)| h * 60 + m)
}
