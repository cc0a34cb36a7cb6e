// src/utils/time.rs

/// Renders a countdown as `HH:MM:SS`. Hours are not wrapped.
pub fn format_clock(seconds: u32) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}
