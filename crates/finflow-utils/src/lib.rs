//! Utility functions and helpers

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(pos) => (&digits[..pos], &digits[pos..]),
        None => (digits, ""),
    };

    let mut result = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Format a money amount, e.g. `$1,234.50`
pub fn format_currency(amount: f64, symbol: &str, decimal_places: usize) -> String {
    let formatted = format!("{:.*}", decimal_places, amount.abs());
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, format_number(formatted))
}

/// Escape text for embedding in HTMX responses
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

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a prefixed document number such as `BILL-3F2A9C1D`
pub fn generate_document_number(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, id[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number("45200.50"), "45,200.50");
        assert_eq!(format_number(-15420), "-15,420");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(45200.0, "$", 2), "$45,200.00");
        assert_eq!(format_currency(-75.5, "$", 2), "-$75.50");
        assert_eq!(format_currency(0.0, "$", 0), "$0");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("Office & Admin"), "Office &amp; Admin");
    }

    #[test]
    fn test_generate_document_number() {
        let number = generate_document_number("BILL");
        assert!(number.starts_with("BILL-"));
        assert_eq!(number.len(), 13);
        assert_ne!(generate_id(), generate_id());
    }
}
