//! Utility functions and helpers

/// Format a number with thousands separators (Indonesian style: `175.000`)
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", s),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push('.');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format an amount with a currency symbol, e.g. `Rp 175.000`
pub fn format_currency(symbol: &str, amount: u64) -> String {
    format!("{} {}", symbol, format_number(amount))
}

/// Short form used on summary cards, e.g. `Rp 175K`, `Rp 1,5JT`
pub fn format_compact(symbol: &str, amount: u64) -> String {
    const THOUSAND: u64 = 1_000;
    const MILLION: u64 = 1_000_000;

    let short = if amount >= MILLION {
        scaled(amount, MILLION, "JT")
    } else if amount >= THOUSAND {
        scaled(amount, THOUSAND, "K")
    } else {
        amount.to_string()
    };
    format!("{} {}", symbol, short)
}

fn scaled(amount: u64, unit: u64, suffix: &str) -> String {
    let whole = amount / unit;
    let tenth = (amount % unit) * 10 / unit;
    if tenth == 0 {
        format!("{}{}", whole, suffix)
    } else {
        format!("{},{}{}", whole, tenth, suffix)
    }
}

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Initials for the avatar badge: first letter of every word
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Zero-padded display id, at least three digits wide
pub fn padded_id(id: u32) -> String {
    format!("{:03}", id)
}

/// Generate an unguessable unique ID
///
/// Random v4 UUID in its 32-character hex form, safe to use in cookies and
/// file names.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(175000), "175.000");
        assert_eq!(format_number(875000), "875.000");
        assert_eq!(format_number(1234567), "1.234.567");
        assert_eq!(format_number(-25000), "-25.000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency("Rp", 175000), "Rp 175.000");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact("Rp", 175000), "Rp 175K");
        assert_eq!(format_compact("Rp", 1500000), "Rp 1,5JT");
        assert_eq!(format_compact("Rp", 2000000), "Rp 2JT");
        assert_eq!(format_compact("Rp", 500), "Rp 500");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='y'>&"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;y&#39;&gt;&amp;"
        );
        assert_eq!(escape_html("Jl. Kalita Blok A No. 15"), "Jl. Kalita Blok A No. 15");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Budi Santoso"), "BS");
        assert_eq!(initials("  Siti   Nurhaliza "), "SN");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_padded_id() {
        assert_eq!(padded_id(2), "002");
        assert_eq!(padded_id(1234), "1234");
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        // consecutive ids share no counter-like suffix
        let next = generate_id();
        assert_ne!(id[..16], next[..16]);
    }
}
