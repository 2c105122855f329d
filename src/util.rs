// Small formatting and cell helpers shared by the loader and the front end.
use crate::types::ClosurePct;
use num_format::{Locale, ToFormattedString};
use std::io::BufRead;

/// Treat an absent or empty cell as missing. The value itself is returned
/// verbatim; whitespace is significant for exact-match lookups.
pub fn non_empty(s: Option<&str>) -> Option<String> {
    match s {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => None,
    }
}

/// Read one trimmed line. `None` once the input is exhausted or unreadable.
pub fn read_answer<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut buf = String::new();
    match reader.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thousands separators for counts, e.g. `12,480`.
    n.to_formatted_string(&Locale::en)
}

pub fn format_pct(pct: ClosurePct) -> String {
    format!("{}%", pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_are_missing() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some(" ")), Some(" ".to_string()));
    }

    #[test]
    fn answers_are_trimmed_lines() {
        let mut input = "  2 \n\n".as_bytes();
        assert_eq!(read_answer(&mut input), Some("2".to_string()));
        assert_eq!(read_answer(&mut input), Some(String::new()));
    }

    #[test]
    fn end_of_input_is_none() {
        let mut input = "1\n".as_bytes();
        assert_eq!(read_answer(&mut input), Some("1".to_string()));
        assert_eq!(read_answer(&mut input), None);
        assert_eq!(read_answer(&mut "".as_bytes()), None);
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_int(12480usize), "12,480");
        assert_eq!(format_int(7usize), "7");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_pct(ClosurePct::from_counts(1, 3)), "33.3%");
        assert_eq!(format_pct(ClosurePct::from_counts(0, 0)), "0.0%");
    }
}
