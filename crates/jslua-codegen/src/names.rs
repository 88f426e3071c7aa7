//! Identifier and literal spelling in Lua.

/// Lua keywords plus the globals the generated code relies on. A JavaScript
/// binding with one of these names is renamed so it cannot shadow them.
const RESERVED: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    // receiver parameter of every generated function
    "self",
    "pcall", "error", "table", "bit32", "rawequal", "math",
];

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Whether `name` can be written as a bare Lua name (`t.name`).
pub fn is_valid_lua_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !LUA_KEYWORDS.contains(&name)
}

/// Spell a JavaScript identifier (or label) as a Lua name.
pub fn escape_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '$' => out.push_str("_USD_"),
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            c => out.push_str(&format!("_U{:X}_", c as u32)),
        }
    }
    if is_reserved(&out) {
        out.insert_str(0, "_R_");
    }
    out
}

/// `.name` when possible, `["name"]` otherwise.
pub fn member_access(name: &str) -> String {
    if is_valid_lua_ident(name) {
        format!(".{}", name)
    } else {
        format!("[{}]", lua_string(name))
    }
}

/// Double-quoted Lua string literal.
pub fn lua_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c.is_ascii() {
            push_ascii(&mut out, c as u8);
        } else {
            out.push(c);
        }
    }
    out.push('"');
    out
}

/// Lua string literal for raw bytes; non-ASCII bytes become `\xNN`.
pub fn lua_bytes(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for &byte in value {
        if byte.is_ascii() {
            push_ascii(&mut out, byte);
        } else {
            out.push_str(&format!("\\x{:02X}", byte));
        }
    }
    out.push('"');
    out
}

fn push_ascii(out: &mut String, byte: u8) {
    match byte {
        b'\\' => out.push_str("\\\\"),
        b'"' => out.push_str("\\\""),
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b'\t' => out.push_str("\\t"),
        b if b < 0x20 || b == 0x7f => out.push_str(&format!("\\{:03}", b)),
        b => out.push(b as char),
    }
}

/// Lua numeral for a JavaScript number.
pub fn lua_number(value: f64) -> String {
    if value.is_nan() {
        return "(0/0)".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "math.huge" } else { "(-math.huge)" }.to_string();
    }
    let abs = value.abs();
    if value.fract() == 0.0 && abs < 1e15 {
        format!("{}", value as i64)
    } else if abs >= 1e15 || abs < 1e-4 {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// JavaScript's string form of a numeric property key (`Number::toString`).
pub fn number_key(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_key(-value));
    }
    if value.is_infinite() {
        return "Infinity".to_string();
    }

    // shortest round-trip digits and decimal exponent, e.g. "1.5e-7"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    // position of the decimal point relative to the digits
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, e.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_ident() {
        assert_eq!(escape_ident("count"), "count");
        assert_eq!(escape_ident("end"), "_R_end");
        assert_eq!(escape_ident("self"), "_R_self");
        assert_eq!(escape_ident("$el"), "_USD_el");
        assert_eq!(escape_ident("caf\u{e9}"), "caf_UE9_");
    }

    #[test]
    fn test_member_access() {
        assert_eq!(member_access("name"), ".name");
        assert_eq!(member_access("end"), "[\"end\"]");
        assert_eq!(member_access("data-id"), "[\"data-id\"]");
        assert_eq!(member_access("self"), ".self");
        assert_eq!(member_access("0"), "[\"0\"]");
    }

    #[test]
    fn test_string_escapes_decode_back() {
        for value in ["plain", "quote \" and \\ slash", "line\nbreak\ttab", "", "\u{e9}t\u{e9}"] {
            let lua = lua_string(value);
            let decoded: String = serde_json::from_str(&lua).unwrap();
            assert_eq!(decoded, value);
        }
        assert_eq!(lua_string("\u{1}"), "\"\\001\"");
    }

    #[test]
    fn test_byte_strings() {
        assert_eq!(lua_bytes(b"a\"b"), "\"a\\\"b\"");
        assert_eq!(lua_bytes(&[b'a', 0xED, 0xA0, 0x80, b'b']), "\"a\\xED\\xA0\\x80b\"");
    }

    #[test]
    fn test_numbers_decode_back() {
        for value in [0.0, 1.0, -42.0, 3.5, 0.1, 123456.789, 1e300, 2.5e-7, 1e15] {
            let text = lua_number(value);
            let decoded: f64 = text.parse().unwrap();
            assert_eq!(decoded, value, "{}", text);
        }
        assert_eq!(lua_number(7.0), "7");
        assert_eq!(lua_number(f64::INFINITY), "math.huge");
        assert_eq!(lua_number(f64::NEG_INFINITY), "(-math.huge)");
        assert_eq!(lua_number(f64::NAN), "(0/0)");
    }

    #[test]
    fn test_number_keys() {
        assert_eq!(number_key(1.0), "1");
        assert_eq!(number_key(1.5), "1.5");
        assert_eq!(number_key(f64::INFINITY), "Infinity");
        assert_eq!(number_key(-0.0), "0");
        assert_eq!(number_key(-2.0), "-2");
        assert_eq!(number_key(0.000001), "0.000001");
        assert_eq!(number_key(1e-7), "1e-7");
        assert_eq!(number_key(1.5e-7), "1.5e-7");
        assert_eq!(number_key(123e18), "123000000000000000000");
        assert_eq!(number_key(1e21), "1e+21");
        assert_eq!(number_key(1.25e30), "1.25e+30");
    }
}
