//! Display formatting for counter values.

/// Formats an integer with `,` thousands separators.
///
/// Grouping starts from the least significant digit; the sign is not
/// grouped. `i64::MIN` is handled without overflow.
pub fn format_grouped(n: i64) -> String {
    let digits = (n as i128).unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, digit) in digits.bytes().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit as char);
    }
    out
}
