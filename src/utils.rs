use std::path::Path;

pub fn format_duration(seconds: f64) -> String {
    // Round once up front so no unit can display as a full next unit.
    let millis = (seconds * 1000.0).round() as u64;
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 59_950 {
        format!("{:.1}s", millis as f64 / 1000.0)
    } else {
        let total = (millis as f64 / 1000.0).round() as u64;
        format!("{}m {}s", total / 60, total % 60)
    }
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// `canonical` must already be canonicalized.
pub fn is_same_file(candidate: &Path, canonical: &Path) -> bool {
    // Name check first so most entries never hit the filesystem. A symlink
    // can alias the target under any name, so it always gets resolved.
    if candidate.file_name() != canonical.file_name() && !candidate.is_symlink() {
        return false;
    }
    candidate
        .canonicalize()
        .map(|resolved| resolved == canonical)
        .unwrap_or(false)
}
