use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

const BACKEND: &str = "https://backend-kemenag-batubara.vercel.app/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Where a dataset comes from: an HTTP endpoint or a local file.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Remote(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Source::Remote(value.to_string())
        } else {
            Source::File(PathBuf::from(value))
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrayerLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub method: u8,
}

impl Default for PrayerLocation {
    fn default() -> Self {
        Self {
            latitude: 3.195,
            longitude: 99.45,
            method: 20,
        }
    }
}

/// Application-wide settings, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub theme: Theme,
    pub staff: Source,
    pub news: Source,
    pub locations: Source,
    pub prayer: Source,
    pub prayer_location: PrayerLocation,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            theme: Theme::Dark,
            staff: Source::Remote(format!("{BACKEND}/data")),
            news: Source::Remote(format!("{BACKEND}/search?keyword=batu+bara")),
            locations: Source::Remote(format!("{BACKEND}/tilok")),
            prayer: Source::Remote("https://api.aladhan.com/v1/calendar".to_string()),
            prayer_location: PrayerLocation::default(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let source = |key: &str, fallback: Source| lookup(key).map(|value| Source::parse(&value)).unwrap_or(fallback);
        let parsed = |key: &str| lookup(key).and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            theme: lookup("PORTAL_THEME")
                .and_then(|value| Theme::parse(&value))
                .unwrap_or(defaults.theme),
            staff: source("STAFF_SOURCE", defaults.staff),
            news: source("NEWS_SOURCE", defaults.news),
            locations: source("LOCATIONS_SOURCE", defaults.locations),
            prayer: source("PRAYER_SOURCE", defaults.prayer),
            prayer_location: PrayerLocation {
                latitude: parsed("PRAYER_LATITUDE").unwrap_or(defaults.prayer_location.latitude),
                longitude: parsed("PRAYER_LONGITUDE").unwrap_or(defaults.prayer_location.longitude),
                method: lookup("PRAYER_METHOD")
                    .and_then(|value| value.parse::<u8>().ok())
                    .unwrap_or(defaults.prayer_location.method),
            },
            data_dir: lookup("PORTAL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }

    pub fn asset(&self, name: &str) -> Source {
        Source::File(self.data_dir.join(name))
    }

    /// Request theme override, falling back to the configured default.
    pub fn theme_or_default(&self, requested: Option<&str>) -> Theme {
        requested.and_then(Theme::parse).unwrap_or(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_remote_backend() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(matches!(settings.staff, Source::Remote(ref url) if url.ends_with("/api/data")));
        assert_eq!(settings.asset("masjid.csv"), Source::File(PathBuf::from("data/masjid.csv")));
    }

    #[test]
    fn environment_overrides_are_applied() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("PORTAL_THEME", "Light"),
            ("STAFF_SOURCE", "/tmp/staff.json"),
            ("PRAYER_LATITUDE", "2.5"),
            ("PRAYER_METHOD", "oops"),
        ]);
        let settings = Settings::from_lookup(|key| vars.get(key).map(|value| value.to_string()));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.staff, Source::File(PathBuf::from("/tmp/staff.json")));
        assert_eq!(settings.prayer_location.latitude, 2.5);
        assert_eq!(settings.prayer_location.method, 20);
    }

    #[test]
    fn request_theme_overrides_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme_or_default(Some("light")), Theme::Light);
        assert_eq!(settings.theme_or_default(Some("neon")), Theme::Dark);
        assert_eq!(settings.theme_or_default(None), Theme::Dark);
    }
}
