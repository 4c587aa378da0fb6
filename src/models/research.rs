use crate::util::{extract_year, parse_coordinates, to_location};
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(crate = "rocket::serde")]
pub struct Research {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub method: String,
    pub coordinates: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(crate = "rocket::serde")]
pub struct ResearchRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Method is required"))]
    pub method: String,
    pub coordinates: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

/// Insertable research payload with the derived columns filled in.
#[derive(Debug, Clone)]
pub struct ResearchRecord {
    pub author: String,
    pub title: String,
    pub method: String,
    pub coordinates: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub location: Option<String>,
    pub year: Option<String>,
}

fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

impl ResearchRecord {
    /// Builds a record from raw field values, recomputing lat/lon from the
    /// coordinate pair, the location from title+summary keywords and the
    /// year from the title.
    pub fn derive(
        title: &str,
        author: &str,
        method: &str,
        coordinates: Option<&str>,
        summary: Option<&str>,
        image: Option<&str>,
        link: Option<&str>,
    ) -> Self {
        let coordinates = coordinates.and_then(clean);
        let summary = summary.and_then(clean);
        let (lat, lon) = parse_coordinates(coordinates.as_deref());
        let search_text = format!("{} {}", title, summary.as_deref().unwrap_or(""));
        let location = to_location(search_text.trim());

        Self {
            author: author.trim().to_string(),
            title: title.trim().to_string(),
            method: method.trim().to_string(),
            coordinates,
            summary,
            image: image.and_then(clean),
            link: link.and_then(clean),
            lat,
            lon,
            location,
            year: extract_year(title),
        }
    }
}

impl From<&ResearchRequest> for ResearchRecord {
    fn from(request: &ResearchRequest) -> Self {
        ResearchRecord::derive(
            &request.title,
            &request.author,
            &request.method,
            request.coordinates.as_deref(),
            request.summary.as_deref(),
            request.image.as_deref(),
            request.link.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_fills_in_computed_columns() {
        let record = ResearchRecord::derive(
            "Pemetaan Batuan di Pesawaran (2020)",
            "Hanif",
            "Geolistrik",
            Some("-5.42, 105.17"),
            Some("Survei resistivitas"),
            None,
            None,
        );

        assert_eq!(record.lat.as_deref(), Some("-5.42"));
        assert_eq!(record.lon.as_deref(), Some("105.17"));
        assert_eq!(record.location.as_deref(), Some("Pesawaran"));
        assert_eq!(record.year.as_deref(), Some("2020"));
    }

    #[test]
    fn derive_turns_blank_optionals_into_none() {
        let record = ResearchRecord::derive("Judul", "Penulis", "Metode", Some("   "), Some(""), Some(" "), None);
        assert!(record.coordinates.is_none());
        assert!(record.summary.is_none());
        assert!(record.image.is_none());
        assert!(record.lat.is_none());
        assert!(record.location.is_none());
        assert!(record.year.is_none());
    }

    #[test]
    fn location_considers_summary_text_too() {
        let record = ResearchRecord::derive("Judul tanpa lokasi", "A", "B", None, Some("pengukuran di ITERA"), None, None);
        assert_eq!(record.location.as_deref(), Some("ITERA"));
    }
}
