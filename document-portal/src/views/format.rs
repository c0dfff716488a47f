use chrono::{DateTime, Local, TimeZone};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const BASE: u64 = 1024;

/// Human-readable size, base 1024, at most two decimals.
///
/// `0 -> "0 Bytes"`, `1024 -> "1 KB"`, `1500 -> "1.46 KB"`. Anything past
/// gigabytes is still expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    while exponent + 1 < SIZE_UNITS.len() && bytes >= BASE.pow(exponent as u32 + 1) {
        exponent += 1;
    }

    let value = bytes as f64 / (BASE as f64).powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[exponent])
}

/// Size in KB with exactly two decimals, used for the selected-file line.
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BASE as f64)
}

/// Local date followed by local time, e.g. `1/15/2024 3:04:05 PM`.
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone, Target: TimeZone>(
    timestamp: &DateTime<Tz>,
    zone: &Target,
) -> String
where
    Target::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(zone)
        .format("%-m/%-d/%Y %-I:%M:%S %p")
        .to_string()
}
