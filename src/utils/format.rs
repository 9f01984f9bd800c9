//! Formatting utilities for file sizes and dates.

/// Format file size for `ls -l` (e.g., "1.2K", "3.4M"), right-aligned.
pub fn format_size(size: Option<u64>) -> String {
    match size {
        None => "    -".to_string(),
        Some(bytes) if bytes >= 1_000_000 => format!("{:4.1}M", bytes as f64 / 1_000_000.0),
        Some(bytes) if bytes >= 1_000 => format!("{:4.1}K", bytes as f64 / 1_000.0),
        Some(bytes) => format!("{:4}B", bytes),
    }
}

/// Format Unix timestamp for terminal display (e.g., "Jan  5 12:34").
pub fn format_date_short(timestamp: Option<u64>) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    match timestamp {
        None => "            ".to_string(),
        Some(ts) => {
            let (_, month, day) = civil_date(ts);
            let hour = (ts % 86400) / 3600;
            let min = (ts % 3600) / 60;
            format!("{} {:2} {:02}:{:02}", MONTHS[month - 1], day, hour, min)
        }
    }
}

/// Format Unix timestamp as ISO date (YYYY-MM-DD).
pub fn format_date_iso(timestamp: u64) -> String {
    let (year, month, day) = civil_date(timestamp);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Split a timestamp into (year, month 1-12, day 1-31).
fn civil_date(timestamp: u64) -> (i64, usize, u64) {
    let mut remaining_days = (timestamp / 86400) as i64;
    let mut year = 1970i64;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for days_in_month in days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year, month, remaining_days as u64 + 1)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
