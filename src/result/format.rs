use serde::Serialize;

/// Display formats for number displays and table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumberFormat {
    /// Rounded integer with thousands separators: `12,345`.
    Count,
    /// Fixed decimals without grouping: `7.25`.
    Fixed(usize),
    /// Fixed decimals with thousands separators: `1,234.50`.
    Grouped(usize),
}

impl NumberFormat {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Count => group_thousands(&format!("{:.0}", value)),
            Self::Fixed(decimals) => format!("{:.*}", *decimals, value),
            Self::Grouped(decimals) => group_thousands(&format!("{:.*}", *decimals, value)),
        }
    }
}

/// Insert `,` every three digits of the integer part of an already formatted
/// decimal number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(pos) => unsigned.split_at(pos),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" after rounding reads as zero.
    if grouped.chars().all(|c| c == '0' || c == ',') && frac_part.chars().all(|c| c == '0' || c == '.') {
        return format!("{}{}", grouped, frac_part);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}
