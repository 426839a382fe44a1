/// Shown in place of the end date for ongoing entries.
pub const PRESENT_MARKER: &str = "至今";

/// Formats `YYYY-MM` style dates as `"YYYY.MM - YYYY.MM"`.
///
/// A missing start yields an empty string; a missing end yields the present marker. Dates with
/// fewer than two hyphen-separated parts are used verbatim.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let Some(start) = start.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let end = match end.filter(|e| !e.is_empty()) {
        Some(end) => format_date(end),
        None => PRESENT_MARKER.to_string(),
    };
    format!("{} - {end}", format_date(start))
}

fn format_date(date: &str) -> String {
    let mut parts = date.split('-');
    match (parts.next(), parts.next()) {
        (Some(year), Some(month)) => format!("{year}.{month}"),
        _ => date.to_string(),
    }
}
