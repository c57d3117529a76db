use crate::models::{Bounds, MapView, Marker};
use crate::record::{FieldValue, Record};
use crate::storage::DataEnvelope;
use tracing::{debug, warn};

pub const DEFAULT_CENTER: (f64, f64) = (3.171246705, 99.42034917);
pub const DEFAULT_ZOOM: u8 = 12;

/// Fraction of the marker span added on every side when fitting the map.
const PADDING: f64 = 0.1;

fn coordinate(record: &Record, field: &str) -> Option<f64> {
    match record.get(field)? {
        FieldValue::Number(value) => Some(*value),
        FieldValue::Text(text) => text.trim().parse::<f64>().ok().filter(|value| value.is_finite()),
        FieldValue::Empty => None,
    }
}

pub fn markers(records: &[Record]) -> Vec<Marker> {
    records
        .iter()
        .filter_map(|record| {
            let (Some(latitude), Some(longitude)) = (coordinate(record, "LATITUDE"), coordinate(record, "LONGITUDE")) else {
                debug!("skipping location without coordinates");
                return None;
            };
            Some(Marker {
                name: record.text("SATUAN KERJA").unwrap_or_default(),
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Smallest box around every marker, padded on each side.
pub fn fit_bounds(markers: &[Marker]) -> Option<Bounds> {
    let first = markers.first()?;
    let mut bounds = Bounds {
        south: first.latitude,
        west: first.longitude,
        north: first.latitude,
        east: first.longitude,
    };
    for marker in &markers[1..] {
        bounds.south = bounds.south.min(marker.latitude);
        bounds.north = bounds.north.max(marker.latitude);
        bounds.west = bounds.west.min(marker.longitude);
        bounds.east = bounds.east.max(marker.longitude);
    }
    let lat_pad = (bounds.north - bounds.south) * PADDING;
    let lon_pad = (bounds.east - bounds.west) * PADDING;
    Some(Bounds {
        south: bounds.south - lat_pad,
        west: bounds.west - lon_pad,
        north: bounds.north + lat_pad,
        east: bounds.east + lon_pad,
    })
}

pub fn map_view(envelope: DataEnvelope) -> MapView {
    let records = if envelope.success == Some(false) {
        warn!("location service reported failure");
        Vec::new()
    } else {
        envelope.data
    };
    let markers = markers(&records);
    MapView {
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
        bounds: fit_bounds(&markers),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn envelope(body: &str) -> DataEnvelope {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn unparseable_coordinates_are_skipped() {
        let view = map_view(envelope(
            r#"{"success":true,"data":[
                {"SATUAN KERJA":"KUA Talawi","LATITUDE":"3.2","LONGITUDE":"99.5"},
                {"SATUAN KERJA":"KUA Sei Balai","LATITUDE":"","LONGITUDE":"99.4"},
                {"SATUAN KERJA":"Kantor Kemenag","LATITUDE":3.0,"LONGITUDE":99.3}
            ]}"#,
        ));
        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].name, "KUA Talawi");
        assert_eq!(view.center, DEFAULT_CENTER);
    }

    #[test]
    fn bounds_are_padded_by_a_tenth_of_the_span() {
        let view = map_view(envelope(
            r#"{"data":[
                {"LATITUDE":"3.0","LONGITUDE":"99.0"},
                {"LATITUDE":"4.0","LONGITUDE":"100.0"}
            ]}"#,
        ));
        let bounds = view.bounds.unwrap();
        assert!((bounds.south - 2.9).abs() < 1e-9);
        assert!((bounds.north - 4.1).abs() < 1e-9);
        assert!((bounds.west - 98.9).abs() < 1e-9);
        assert!((bounds.east - 100.1).abs() < 1e-9);
    }

    #[test]
    fn failed_response_shows_no_markers() {
        let view = map_view(envelope(r#"{"success":false,"data":[{"LATITUDE":"3","LONGITUDE":"99"}]}"#));
        assert!(view.markers.is_empty());
        assert_eq!(view.bounds, None);
    }
}
