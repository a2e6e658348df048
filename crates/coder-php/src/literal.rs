//! PHP literal decoding and printing

/// Decode an integer literal (`42`, `0x2A`, `052`, `0o52`, `0b101010`,
/// `1_000`), folding in an optional sign
///
/// Returns `None` when the magnitude does not fit in `i64`; PHP turns
/// such literals into floats, which are kept verbatim instead. This
/// includes `-9223372036854775808`, which PHP negates after reading the
/// magnitude as a float.
#[must_use]
pub(crate) fn parse_int(text: &str, negative: bool) -> Option<i64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(hex) = lower.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (2, bin)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        (8, oct)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    let magnitude = i64::from_str_radix(body, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Name of the PHP constant holding `i64::MIN`
pub(crate) const INT_MIN_CONSTANT: &str = "PHP_INT_MIN";

/// Print an integer so PHP reads it back as an integer
#[must_use]
pub(crate) fn format_int(i: i64) -> String {
    if i == i64::MIN {
        INT_MIN_CONSTANT.to_string()
    } else {
        i.to_string()
    }
}

/// Decode a float literal (`1.5`, `.5`, `1e3`, `1_000.5`)
///
/// Returns `None` for text that does not denote a finite float.
#[must_use]
pub(crate) fn parse_float(text: &str, negative: bool) -> Option<f64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let value: f64 = digits.parse().ok()?;
    let value = if negative { -value } else { value };
    value.is_finite().then_some(value)
}

/// Decode a single-quoted string literal including its quotes
///
/// Only `\\` and `\'` are escapes; any other backslash is literal.
#[must_use]
pub(crate) fn parse_single_quoted(text: &str) -> Option<String> {
    let body = strip_binary_prefix(text)
        .strip_prefix('\'')?
        .strip_suffix('\'')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next @ ('\\' | '\'')) = chars.peek() {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    Some(out)
}

/// Decode a double-quoted string literal without interpolation,
/// including its quotes
///
/// Returns `None` if the literal interpolates variables or escapes a
/// non-ASCII byte.
#[must_use]
pub(crate) fn parse_double_quoted(text: &str) -> Option<String> {
    let body = strip_binary_prefix(text)
        .strip_prefix('"')?
        .strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' if chars.peek().is_some_and(|&n| n == '_' || n == '{' || n.is_alphabetic()) => return None,
            '{' if chars.peek() == Some(&'$') => return None,
            '\\' => decode_escape(&mut chars, &mut out)?,
            c => out.push(c),
        }
    }
    Some(out)
}

fn decode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) -> Option<()> {
    let Some(&next) = chars.peek() else {
        out.push('\\');
        return Some(());
    };
    let simple = match next {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'v' => Some('\u{0B}'),
        'e' => Some('\u{1B}'),
        'f' => Some('\u{0C}'),
        '\\' => Some('\\'),
        '$' => Some('$'),
        '"' => Some('"'),
        _ => None,
    };
    if let Some(c) = simple {
        chars.next();
        out.push(c);
        return Some(());
    }
    match next {
        '0'..='7' => {
            let mut code = 0u32;
            for _ in 0..3 {
                match chars.peek().and_then(|c| c.to_digit(8)) {
                    Some(d) => {
                        code = code * 8 + d;
                        chars.next();
                    }
                    None => break,
                }
            }
            out.push(byte_char(code)?);
        }
        'x' => {
            chars.next();
            let mut code = 0u32;
            let mut len = 0;
            while len < 2 {
                match chars.peek().and_then(|c| c.to_digit(16)) {
                    Some(d) => {
                        code = code * 16 + d;
                        chars.next();
                        len += 1;
                    }
                    None => break,
                }
            }
            if len == 0 {
                out.push_str("\\x");
            } else {
                out.push(byte_char(code)?);
            }
        }
        'u' => {
            chars.next();
            if chars.peek() != Some(&'{') {
                out.push_str("\\u");
                return Some(());
            }
            chars.next();
            let mut hex = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                hex.push(c);
            }
            out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
        }
        _ => out.push('\\'),
    }
    Some(())
}

/// Byte escapes outside ASCII cannot be represented in a `String`
fn byte_char(code: u32) -> Option<char> {
    (code < 0x80).then(|| char::from_u32(code)).flatten()
}

fn strip_binary_prefix(text: &str) -> &str {
    text.strip_prefix(['b', 'B']).unwrap_or(text)
}

/// Print a string as a single-quoted literal
#[must_use]
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Print a float so PHP reads it back as a float
#[must_use]
pub(crate) fn format_float(x: f64) -> String {
    let text = format!("{x:?}");
    if text.contains(['.', 'e', 'E']) || !x.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}
