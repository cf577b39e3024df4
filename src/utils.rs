//! Helpers shared by the pipeline and the CLI output.

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Size reduction as a percentage rounded to one decimal place.
///
/// Positive means the file shrank, negative means it grew. A zero original
/// size yields 0.0.
pub fn size_trimmed_percent(size_init: u64, size_end: u64) -> f64 {
    if size_init == 0 {
        return 0.0;
    }
    let ratio = (size_init as f64 - size_end as f64) / size_init as f64;
    let percent = (1000.0 * ratio).round() / 10.0;
    // Slight growth rounds to -0.0, which would print as "-0"
    if percent == 0.0 {
        0.0
    } else {
        percent
    }
}
