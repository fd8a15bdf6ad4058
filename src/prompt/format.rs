use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder for missing values in the entry table
pub const MISSING: &str = "—";

/// Format an amount as Brazilian reais: `R$ 1.234,56`, `-R$ 10,00`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Format a percentage with one decimal and a comma separator: `12,5%`
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value).replace('.', ",")
}

/// `dd/mm/yyyy`, or the placeholder when absent
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Parse the date formats the dashboard produces.
/// RFC 3339 timestamps keep their own calendar date.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(12.5), "R$ 12,50");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-350.1), "-R$ 350,10");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(12.345), "12,3%");
        assert_eq!(format_pct(0.0), "0,0%");
        assert_eq!(format_pct(-40.0), "-40,0%");
    }

    #[test]
    fn test_parse_entry_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_entry_date("2024-03-05"), expected);
        assert_eq!(parse_entry_date("2024-03-05T10:00:00Z"), expected);
        assert_eq!(parse_entry_date("2024-03-05T23:30:00-03:00"), expected);
        assert_eq!(parse_entry_date("2024-03-05 08:15:00"), expected);
        assert_eq!(parse_entry_date("2024-03-05T08:15:00.123"), expected);
        assert_eq!(parse_entry_date("05/03/2024"), expected);
        assert_eq!(parse_entry_date("ontem"), None);
        assert_eq!(parse_entry_date("  "), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 9)), "09/01/2024");
        assert_eq!(format_date(None), "—");
    }
}
