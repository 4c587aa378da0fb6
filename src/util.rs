use regex::Regex;
use std::sync::LazyLock;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("invalid year regex"));

/// Pulls a publication year out of titles like "Analisis ... (2021)".
pub fn extract_year(title: &str) -> Option<String> {
    YEAR_RE.captures(title).map(|caps| caps[1].to_string())
}

/// Splits a raw "lat, lon" pair. Either half may be missing.
pub fn parse_coordinates(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(raw) = raw else { return (None, None) };
    let mut parts = raw.splitn(2, ',').map(str::trim);
    let lat = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    let lon = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    (lat, lon)
}

/// Maps free text onto one of the known study areas by keyword.
pub fn to_location(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let location = if lower.contains("bandar lampung") {
        "Bandar Lampung"
    } else if lower.contains("pesawaran") {
        "Pesawaran"
    } else if lower.contains("jati agung") || lower.contains("jatimulyo") {
        "Jati Agung"
    } else if lower.contains("way umpu") {
        "Way Umpu"
    } else if lower.contains("itera") {
        "ITERA"
    } else {
        return None;
    };

    Some(location.to_string())
}
