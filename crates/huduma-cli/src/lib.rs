//! Huduma CLI library: API client and output helpers.

pub mod api_client;

use huduma_core::DocumentRecord;

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// Human-readable size as shown in the document library: `B`, `KB` or `MB`, one decimal.
pub fn format_file_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KB {
        format!("{} B", bytes)
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / MB)
    }
}

/// `format_file_size` for a stored string size; unparseable values are shown as-is.
pub fn display_file_size(record: &DocumentRecord) -> String {
    record
        .size_bytes()
        .map(format_file_size)
        .unwrap_or_else(|| record.file_size.clone())
}

/// Keep only records whose service label equals `service`, ignoring case.
pub fn filter_by_service<'a>(
    records: Vec<&'a DocumentRecord>,
    service: &str,
) -> Vec<&'a DocumentRecord> {
    let wanted = service.trim();
    records
        .into_iter()
        .filter(|r| r.service.trim().eq_ignore_ascii_case(wanted))
        .collect()
}

/// Truncate a string to `max_len` characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
