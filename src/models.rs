use crate::chart::ChartData;
use crate::record::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
    pub theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StaffQuery {
    pub golongan: Option<String>,
    pub status: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StaffOptions {
    pub golongan: Vec<String>,
    pub status: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StaffStatistics {
    pub total: usize,
    pub pns: usize,
    pub non_pns: usize,
    pub satuan_kerja: usize,
}

#[derive(Debug, Serialize)]
pub struct StaffCharts {
    pub generasi: ChartData,
    pub jenjang_pendidikan: ChartData,
    pub masa_kerja: ChartData,
    pub masa_kerja_lima_tahunan: ChartData,
}

#[derive(Debug, Serialize)]
pub struct StaffDashboard {
    pub options: StaffOptions,
    pub statistics: StaffStatistics,
    pub charts: StaffCharts,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstitutionQuery {
    pub jenjang: Option<String>,
    pub status: Option<String>,
    pub kecamatan: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InstitutionOptions {
    pub jenjang: Vec<String>,
    pub status: Vec<String>,
    pub kecamatan: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InstitutionSummary {
    pub total: usize,
    pub options: InstitutionOptions,
    pub by_jenjang: ChartData,
    pub by_status: ChartData,
    pub top_kecamatan: ChartData,
    pub top_afiliasi: ChartData,
    pub staff_by_jenjang: ChartData,
    pub institutions: Vec<Record>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorshipQuery {
    pub kecamatan: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorshipSummary {
    pub kind: &'static str,
    pub total: usize,
    pub kecamatan: Vec<String>,
    pub top_kecamatan: ChartData,
    pub by_status: ChartData,
    pub by_founding_year: ChartData,
    pub capacity_by_kecamatan: ChartData,
    pub average_land_area: Option<f64>,
    pub places: Vec<Record>,
}

#[derive(Debug, Serialize)]
pub struct MarriageSummary {
    pub total: usize,
    pub monthly: ChartData,
    pub top_kua: ChartData,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub start: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub image: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsCarousel {
    pub total: usize,
    pub start: usize,
    pub next_start: usize,
    pub items: Vec<NewsItem>,
    pub headlines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub bounds: Option<Bounds>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Deserialize)]
pub struct QiblaQuery {
    pub lat: f64,
    pub lon: f64,
    pub heading: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct QiblaResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub bearing: f64,
    pub heading: Option<f64>,
    /// Needle angle relative to the device; 0 means facing the Kaaba.
    pub needle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerSlot {
    pub key: &'static str,
    pub label: &'static str,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextPrayer {
    pub key: &'static str,
    pub label: &'static str,
    pub at: String,
    pub countdown: String,
}

#[derive(Debug, Serialize)]
pub struct PrayerSchedule {
    pub date: String,
    pub timings: Vec<PrayerSlot>,
    pub next: Option<NextPrayer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceQuery {
    pub satker: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: &'static str,
    pub slug: String,
    pub tugas_dan_fungsi: &'static str,
    pub layanan: &'static str,
    pub sop: &'static str,
    pub ikm: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceDirectory {
    pub services: Vec<Service>,
    pub selected: Service,
}

#[derive(Debug, Serialize)]
pub struct Contact {
    pub address: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
}
