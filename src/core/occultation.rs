use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::Coord;

/// One vertex of a shadow path with its UTC timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathPoint {
    pub position: Coord,
    pub time_utc: String,
}

impl PathPoint {
    #[must_use]
    pub fn new(lon: f64, lat: f64, time_utc: impl Into<String>) -> Self {
        Self {
            position: Coord::new(lon, lat),
            time_utc: time_utc.into(),
        }
    }
}

/// Time tick along the central line, offset from mid-event in seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeMarker {
    pub position: Coord,
    pub time_utc: String,
    pub seconds_from_mid: i64,
}

impl TimeMarker {
    #[must_use]
    pub fn new(lon: f64, lat: f64, time_utc: impl Into<String>, seconds_from_mid: i64) -> Self {
        Self {
            position: Coord::new(lon, lat),
            time_utc: time_utc.into(),
            seconds_from_mid,
        }
    }
}

/// Reported outcome of an observation station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationStatus {
    Positive,
    Negative,
    Clouded,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl StationStatus {
    /// Parses a status tag. Matching is exact; unknown tags become `Other`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "clouded" => Self::Clouded,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Clouded => "clouded",
            Self::Other(tag) => tag,
        }
    }
}

impl Default for StationStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationStation {
    pub name: String,
    pub position: Coord,
    pub status: StationStatus,
}

impl ObservationStation {
    #[must_use]
    pub fn new(name: impl Into<String>, lon: f64, lat: f64, status: &str) -> Self {
        Self {
            name: name.into(),
            position: Coord::new(lon, lat),
            status: StationStatus::from_tag(status),
        }
    }
}

/// Draw group a station is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationGroupKind {
    Positive,
    Negative,
    Other,
}

/// Stations routed by outcome. Every station lands in exactly one group and
/// input order is kept inside each group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationGroups<'a> {
    pub positive: Vec<&'a ObservationStation>,
    pub negative: Vec<&'a ObservationStation>,
    pub other: Vec<&'a ObservationStation>,
}

impl<'a> StationGroups<'a> {
    #[must_use]
    pub fn partition(stations: &'a [ObservationStation]) -> Self {
        let mut groups = Self::default();
        for station in stations {
            match station.status {
                StationStatus::Positive => groups.positive.push(station),
                StationStatus::Negative => groups.negative.push(station),
                StationStatus::Clouded | StationStatus::Other(_) => groups.other.push(station),
            }
        }
        groups
    }

    /// Groups in draw order: positive, negative, other.
    #[must_use]
    pub fn in_draw_order(&self) -> [(StationGroupKind, &[&'a ObservationStation]); 3] {
        [
            (StationGroupKind::Positive, &self.positive),
            (StationGroupKind::Negative, &self.negative),
            (StationGroupKind::Other, &self.other),
        ]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len() + self.other.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Asteroidal occultation event: metadata, shadow path and observer reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OccultationEvent {
    pub event_id: String,
    pub body_name: String,
    pub star_id: String,
    pub time_utc: String,
    pub magnitude_drop: f64,
    pub duration_seconds: f64,
    pub central_line: Vec<PathPoint>,
    pub northern_limit: Vec<PathPoint>,
    pub southern_limit: Vec<PathPoint>,
    pub time_markers: Vec<TimeMarker>,
    pub stations: Vec<ObservationStation>,
}

impl OccultationEvent {
    /// All shadow-path vertices: central line, then northern and southern limits.
    pub fn path_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.central_line
            .iter()
            .chain(&self.northern_limit)
            .chain(&self.southern_limit)
            .map(|point| point.position)
    }

    #[must_use]
    pub fn station_groups(&self) -> StationGroups<'_> {
        StationGroups::partition(&self.stations)
    }

    /// Event time parsed as RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f]` (UTC).
    #[must_use]
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        parse_utc_timestamp(&self.time_utc)
    }
}

pub(crate) fn parse_utc_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    let text = text.trim_end_matches(" UTC").trim_end_matches('Z');
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{ObservationStation, OccultationEvent, StationGroups, StationStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn unknown_status_routes_to_other() {
        let stations = vec![
            ObservationStation::new("Roma", 12.5, 41.9, "positive"),
            ObservationStation::new("Firenze", 11.2, 43.7, "negative"),
            ObservationStation::new("Torino", 7.7, 45.1, "clouded"),
            ObservationStation::new("Berlin", 13.4, 52.5, "Positive"),
        ];
        let groups = StationGroups::partition(&stations);
        assert_eq!(groups.positive.len(), 1);
        assert_eq!(groups.negative.len(), 1);
        assert_eq!(groups.other.len(), 2);
        assert_eq!(
            groups.other[1].status,
            StationStatus::Other("Positive".to_owned())
        );
    }

    #[test]
    fn event_time_accepts_common_utc_layouts() {
        let expected = Utc.with_ymd_and_hms(2025, 11, 28, 18, 45, 0).unwrap();
        for text in [
            "2025-11-28T18:45:00Z",
            "2025-11-28 18:45:00",
            "2025-11-28T18:45:00",
            "2025-11-28 18:45:00 UTC",
        ] {
            let event = OccultationEvent {
                time_utc: text.to_owned(),
                ..OccultationEvent::default()
            };
            assert_eq!(event.event_time(), Some(expected), "{text}");
        }
    }
}
