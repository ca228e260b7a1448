//! Field reports: incident and point-of-interest drafts.
//!
//! Validation runs client-side so a ranger in the field gets immediate
//! feedback before any upload starts; the hosted backend enforces the same
//! rules server-side.

mod client;

pub use client::{Photo, ReportError, ReportsClient};

use serde::{Deserialize, Serialize};

/// Maximum incident title length
pub const MAX_TITLE_LEN: usize = 120;

/// Maximum incident description length
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Maximum point-of-interest name length
pub const MAX_NAME_LEN: usize = 80;

/// Maximum point-of-interest notes length
pub const MAX_NOTES_LEN: usize = 1000;

/// Severity ladder for incident triage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Categories of points of interest rangers submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationCategory {
    Waterhole,
    Viewpoint,
    Campsite,
    RangerPost,
    Gate,
    Other,
}

/// An incident report as composed in the field, before submission
#[derive(Debug, Clone, Serialize)]
pub struct IncidentDraft {
    pub title: String,
    pub description: String,
    pub severity: IncidentSeverity,
    pub latitude: f64,
    pub longitude: f64,
}

/// A point of interest as composed in the field, before submission
#[derive(Debug, Clone, Serialize)]
pub struct LocationDraft {
    pub name: String,
    pub category: LocationCategory,
    pub latitude: f64,
    pub longitude: f64,
    pub notes: String,
}

/// Validate an incident draft
pub fn validate_incident(draft: &IncidentDraft) -> Result<(), String> {
    if draft.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if draft.title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "Title is too long (max {} characters)",
            MAX_TITLE_LEN
        ));
    }
    if draft.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Description is too long (max {} characters)",
            MAX_DESCRIPTION_LEN
        ));
    }
    validate_coordinates(draft.latitude, draft.longitude)
}

/// Validate a point-of-interest draft
pub fn validate_location(draft: &LocationDraft) -> Result<(), String> {
    if draft.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if draft.name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name is too long (max {} characters)", MAX_NAME_LEN));
    }
    if draft.notes.chars().count() > MAX_NOTES_LEN {
        return Err(format!(
            "Notes are too long (max {} characters)",
            MAX_NOTES_LEN
        ));
    }
    validate_coordinates(draft.latitude, draft.longitude)
}

/// Validate a coordinate pair
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

/// Format a coordinate pair for display ("2.153470° S, 34.686190° E")
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.6}° {}, {:.6}° {}",
        latitude.abs(),
        ns,
        longitude.abs(),
        ew
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident() -> IncidentDraft {
        IncidentDraft {
            title: "Snare line near waterhole".to_string(),
            description: "Six wire snares along the western game trail.".to_string(),
            severity: IncidentSeverity::High,
            latitude: -2.15347,
            longitude: 34.68619,
        }
    }

    fn location() -> LocationDraft {
        LocationDraft {
            name: "Msima Waterhole".to_string(),
            category: LocationCategory::Waterhole,
            latitude: -2.2,
            longitude: 34.7,
            notes: "Dry season refuge, heavy elephant traffic.".to_string(),
        }
    }

    #[test]
    fn test_validate_incident() {
        assert!(validate_incident(&incident()).is_ok());

        let mut blank = incident();
        blank.title = "   ".to_string();
        assert_eq!(validate_incident(&blank).unwrap_err(), "Title is required");

        let mut long_title = incident();
        long_title.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(validate_incident(&long_title).is_err());

        let mut long_description = incident();
        long_description.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(validate_incident(&long_description).is_err());
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location(&location()).is_ok());

        let mut blank = location();
        blank.name = String::new();
        assert_eq!(validate_location(&blank).unwrap_err(), "Name is required");

        let mut long_notes = location();
        long_notes.notes = "x".repeat(MAX_NOTES_LEN + 1);
        assert!(validate_location(&long_notes).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());

        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(-90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.1).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(
            format_coordinates(-2.15347, 34.68619),
            "2.153470° S, 34.686190° E"
        );
        assert_eq!(
            format_coordinates(51.5074, -0.1278),
            "51.507400° N, 0.127800° W"
        );
        assert_eq!(format_coordinates(0.0, 0.0), "0.000000° N, 0.000000° E");
    }

    #[test]
    fn test_severity_wire_format() {
        assert_eq!(
            serde_json::to_value(IncidentSeverity::Critical).unwrap(),
            "critical"
        );
        assert_eq!(
            serde_json::to_value(LocationCategory::RangerPost).unwrap(),
            "ranger_post"
        );
    }
}
