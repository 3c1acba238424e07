/// Renders an amount as whole rupees with comma thousands separators, e.g. `₹1,234,567`.
pub fn format_rupees(amount: f64) -> String {
    format!("₹{}", group_thousands(amount))
}

/// Rounds to whole units (ties to even) and inserts a comma every three digits.
pub fn group_thousands(amount: f64) -> String {
    let rounded = format!("{amount:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) if rest.bytes().any(|b| b != b'0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}")
}
