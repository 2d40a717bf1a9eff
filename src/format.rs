//! Display formatters for raw form values.
//!
//! Every function here is total: malformed input degrades to a neutral
//! representation instead of failing, so a document can always be rendered.

/// Currency symbol used for Brazilian reais.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Parses a free-text amount the way the entry form accepts it.
///
/// Surrounding whitespace is ignored and the first `,` is read as the decimal
/// separator.  The longest numeric prefix is used (`"12abc"` is `12`),
/// including a decimal exponent (`"1,5e2"` is `150`); input without any
/// digits, or whose value is not finite, yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let normalized = raw.trim().replacen(',', ".", 1);
    let bytes = normalized.as_bytes();
    let mut index = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            index += 1;
            true
        }
        Some(b'+') => {
            index += 1;
            false
        }
        _ => false,
    };

    let int_start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    let int_part = &normalized[int_start..index];

    let mut frac_part = "";
    if index < bytes.len() && bytes[index] == b'.' {
        let frac_start = index + 1;
        let mut cursor = frac_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        frac_part = &normalized[frac_start..cursor];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return 0.0;
    }
    if index < bytes.len() && bytes[index] == b'.' {
        index += 1 + frac_part.len();
    }

    let exponent = exponent_at(&normalized[index..]);
    let literal = format!(
        "{}.{}e{}",
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exponent.unwrap_or("0")
    );
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative {
                -value
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Returns the signed exponent digits of an `e`/`E` suffix at the start of
/// `rest`, or `None` when there is no complete exponent there.
fn exponent_at(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix(|c: char| c == 'e' || c == 'E')?;
    let sign_len = usize::from(body.starts_with(|c: char| c == '+' || c == '-'));
    let digits = body[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    Some(&body[..sign_len + digits])
}

/// Splits an amount into its sign and whole cents, rounding half away from zero.
///
/// Amounts beyond `u128` cents saturate.
pub(crate) fn to_cents(value: f64) -> (bool, u128) {
    if !value.is_finite() {
        return (false, 0);
    }
    let cents = (value.abs() * 100.0).round() as u128;
    (value.is_sign_negative() && cents > 0, cents)
}

fn group_thousands(mut value: u128) -> String {
    let mut groups = Vec::new();
    loop {
        groups.push(value % 1000);
        value /= 1000;
        if value == 0 {
            break;
        }
    }

    let mut out = groups.pop().unwrap_or_default().to_string();
    for group in groups.iter().rev() {
        out.push('.');
        out.push_str(&format!("{:03}", group));
    }
    out
}

fn format_cents(cents: u128) -> String {
    format!("{},{:02}", group_thousands(cents / 100), cents % 100)
}

/// Formats a raw amount as Brazilian currency, e.g. `"1250,50"` becomes `R$ 1.250,50`.
///
/// Unparseable input renders as `R$ 0,00`.
pub fn format_currency(raw: &str) -> String {
    let (negative, cents) = to_cents(parse_amount(raw));
    let sign = if negative { "-" } else { "" };
    format!("{}{} {}", sign, CURRENCY_SYMBOL, format_cents(cents))
}

/// Formats a raw amount without the currency symbol, e.g. `"999,90"`.
pub fn format_currency_bare(raw: &str) -> String {
    format_currency(raw).replacen(CURRENCY_SYMBOL, "", 1).trim().to_owned()
}

/// Rewrites an ISO `YYYY-MM-DD` date as `DD/MM/YYYY`.
///
/// Empty input stays empty.  Any string with exactly three `-`-separated parts
/// is reassembled mechanically without calendar checks; everything else is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_brazilian_separators() {
        assert_eq!(format_currency("1250,50"), "R$ 1.250,50");
        assert_eq!(format_currency("999.9"), "R$ 999,90");
        assert_eq!(format_currency("1234567"), "R$ 1.234.567,00");
    }

    #[test]
    fn invalid_currency_degrades_to_zero() {
        assert_eq!(format_currency("abc"), "R$ 0,00");
        assert_eq!(format_currency(""), "R$ 0,00");
        assert_eq!(format_currency_bare("abc"), "0,00");
    }

    #[test]
    fn currency_takes_leading_numeric_prefix() {
        assert_eq!(format_currency(" 12abc"), "R$ 12,00");
        assert_eq!(format_currency(",5"), "R$ 0,50");
        // Only the first comma acts as a decimal separator.
        assert_eq!(format_currency("1.250,50"), "R$ 1,25");
    }

    #[test]
    fn currency_reads_exponents() {
        assert_eq!(format_currency("1e3"), "R$ 1.000,00");
        assert_eq!(format_currency("1,5e2"), "R$ 150,00");
        assert_eq!(format_currency("25E-1"), "R$ 2,50");
        // An exponent marker without digits ends the number.
        assert_eq!(format_currency("7e"), "R$ 7,00");
        assert_eq!(format_currency("7e+x"), "R$ 7,00");
        assert_eq!(format_currency("1e400"), "R$ 0,00");
    }

    #[test]
    fn huge_amounts_keep_their_value() {
        assert_eq!(
            format_currency("999999999999999999"),
            "R$ 1.000.000.000.000.000.000,00"
        );
        assert_eq!(format_currency("5e20"), "R$ 500.000.000.000.000.000.000,00");
    }

    #[test]
    fn currency_rounds_and_signs() {
        assert_eq!(format_currency("0,005"), "R$ 0,01");
        assert_eq!(format_currency("-5"), "-R$ 5,00");
        assert_eq!(format_currency("-0,001"), "R$ 0,00");
    }

    #[test]
    fn bare_currency_strips_symbol() {
        assert_eq!(format_currency_bare("999,90"), "999,90");
        assert_eq!(format_currency_bare("1250,5"), "1.250,50");
    }

    #[test]
    fn dates_are_reassembled() {
        assert_eq!(format_date("2024-03-07"), "07/03/2024");
        assert_eq!(format_date("2024-13-40"), "40/13/2024");
        assert_eq!(format_date("a-b-c"), "c/b/a");
    }

    #[test]
    fn dates_fall_back_to_input() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("bad-input"), "bad-input");
        assert_eq!(format_date("2024-03-07-01"), "2024-03-07-01");
        assert_eq!(format_date("07/03/2024"), "07/03/2024");
    }
}
