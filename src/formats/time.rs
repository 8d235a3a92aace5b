use crate::error::TimeError;

/// `HH:MM:SS,mmm`
pub fn format_srt_timestamp(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let milli = ms % 1000;

    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{min:02}:{sec:02},{milli:03}")
}

/// `H:MM:SS.cc`, truncating to whole centiseconds.
pub fn format_ass_timestamp(ms: u64) -> String {
    let total_centis = ms / 10;
    let centis = total_centis % 100;
    let total_seconds = total_centis / 100;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}

pub fn parse_srt_timestamp(s: &str) -> Result<u64, TimeError> {
    let t = s.trim();
    let (hms, frac) = t
        .split_once(',')
        .ok_or_else(|| TimeError::invalid(t, "missing ',' before milliseconds"))?;
    let milli = parse_field(t, frac, 3, "bad milliseconds")?;
    let seconds = parse_clock(t, hms)?;
    seconds
        .checked_mul(1000)
        .and_then(|v| v.checked_add(milli))
        .ok_or_else(|| TimeError::invalid(t, "timestamp out of range"))
}

pub fn parse_ass_timestamp(s: &str) -> Result<u64, TimeError> {
    let t = s.trim();
    let (hms, frac) = t
        .split_once('.')
        .ok_or_else(|| TimeError::invalid(t, "missing '.' before centiseconds"))?;
    let centis = parse_field(t, frac, 2, "bad centiseconds")?;
    let seconds = parse_clock(t, hms)?;
    seconds
        .checked_mul(100)
        .and_then(|v| v.checked_add(centis))
        .and_then(|v| v.checked_mul(10))
        .ok_or_else(|| TimeError::invalid(t, "timestamp out of range"))
}

/// Parses `start --> end` into a millisecond pair.
pub fn parse_time_range_arrow(line: &str) -> Result<(u64, u64), TimeError> {
    let parts: Vec<&str> = line.split("-->").collect();
    if parts.len() != 2 {
        return Err(TimeError::invalid(line.trim(), "expected exactly one '-->'"));
    }
    let start = parse_srt_timestamp(parts[0])?;
    let end = parse_srt_timestamp(parts[1])?;
    Ok((start, end))
}

// Whole seconds from `H:MM:SS`.
fn parse_clock(whole: &str, hms: &str) -> Result<u64, TimeError> {
    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(TimeError::invalid(whole, "expected H:MM:SS"));
    }

    let h = parse_field(whole, parts[0], usize::MAX, "bad hours")?;
    let m = parse_field(whole, parts[1], 2, "bad minutes")?;
    let s = parse_field(whole, parts[2], 2, "bad seconds")?;
    if m >= 60 {
        return Err(TimeError::invalid(whole, "minutes out of range"));
    }
    if s >= 60 {
        return Err(TimeError::invalid(whole, "seconds out of range"));
    }

    h.checked_mul(3600)
        .and_then(|v| v.checked_add(m * 60 + s))
        .ok_or_else(|| TimeError::invalid(whole, "timestamp out of range"))
}

fn parse_field(
    whole: &str,
    field: &str,
    max_digits: usize,
    reason: &'static str,
) -> Result<u64, TimeError> {
    if field.is_empty() || field.len() > max_digits || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::invalid(whole, reason));
    }
    field.parse().map_err(|_| TimeError::invalid(whole, reason))
}
