use crate::models::QiblaResponse;
use thiserror::Error;

pub const KAABA: (f64, f64) = (21.4225, 39.8262);

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Folds any angle into [0, 360).
pub fn normalize_deg(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(360.0);
    if folded >= 360.0 { 0.0 } else { folded }
}

/// Initial great-circle bearing from a position to the Kaaba, clockwise from north.
pub fn bearing_to_qibla(latitude: f64, longitude: f64) -> f64 {
    let (kaaba_lat, kaaba_lon) = (KAABA.0.to_radians(), KAABA.1.to_radians());
    let lat = latitude.to_radians();
    let delta = kaaba_lon - longitude.to_radians();
    let y = delta.sin() * kaaba_lat.cos();
    let x = lat.cos() * kaaba_lat.sin() - lat.sin() * kaaba_lat.cos() * delta.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

pub fn compass(latitude: f64, longitude: f64, heading: Option<f64>) -> Result<QiblaResponse, CoordinateError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoordinateError::Latitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoordinateError::Longitude(longitude));
    }
    let bearing = bearing_to_qibla(latitude, longitude);
    let heading = heading.filter(|value| value.is_finite()).map(normalize_deg);
    Ok(QiblaResponse {
        latitude,
        longitude,
        bearing,
        heading,
        needle: heading.map(|heading| normalize_deg(bearing - heading)),
    })
}
