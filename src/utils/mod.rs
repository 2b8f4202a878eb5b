/// Reformats a Brazilian phone number for display.
///
/// Non-digit characters are ignored when counting. Eleven digits become
/// `(DD) DDDDD-DDDD`, ten digits become `(DD) DDDD-DDDD`, and anything else
/// is returned exactly as given. Any Unicode digit counts, and the digits are
/// written back as typed.
pub fn format_phone(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_numeric()).collect();
    let group = |range: std::ops::Range<usize>| digits[range].iter().collect::<String>();

    match digits.len() {
        11 => format!("({}) {}-{}", group(0..2), group(2..7), group(7..11)),
        10 => format!("({}) {}-{}", group(0..2), group(2..6), group(6..10)),
        _ => raw.to_string(),
    }
}

/// Size in megabytes with one decimal, as shown next to each selected file.
pub fn format_size_mb(size_bytes: usize) -> String {
    format!("{:.1}MB", size_bytes as f64 / (1024.0 * 1024.0))
}
