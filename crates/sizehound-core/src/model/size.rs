/// Byte-count formatting and parsing.
///
/// All internal sizes are `u64` bytes. Floating point is only used at the
/// display boundary. Units are binary (1 KB = 1024 B) and labelled with the
/// short forms users expect from a disk tool.
use crate::error::ScanError;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count into a human-readable string.
///
/// Bytes are printed verbatim, KB/MB with one decimal, GB/TB with two.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{bytes} B"),
        1 | 2 => format!("{value:.1} {}", UNITS[unit]),
        _ => format!("{value:.2} {}", UNITS[unit]),
    }
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a size such as `512`, `10KB`, `1.5 MB` or `2g` into bytes.
///
/// The unit suffix is case-insensitive and the trailing `B` is optional
/// (`10K` == `10KB`).
pub fn parse_size(input: &str) -> Result<u64, ScanError> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| ScanError::invalid(format!("not a size: {input:?}")))?;

    let multiplier: u64 = match suffix.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1 << 10,
        "M" | "MB" => 1 << 20,
        "G" | "GB" => 1 << 30,
        "T" | "TB" => 1 << 40,
        other => {
            return Err(ScanError::invalid(format!(
                "unknown size unit {other:?} in {input:?}"
            )))
        }
    };
    Ok((value * multiplier as f64).round() as u64)
}
