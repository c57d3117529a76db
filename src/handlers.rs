use crate::errors::AppError;
use crate::export::{chart_csv, chart_png, records_csv, ExportFile};
use crate::institutions::{self, public_rows};
use crate::locations::map_view;
use crate::marriage::{self, MarriageFile};
use crate::models::{
    Contact, InstitutionQuery, InstitutionSummary, MapView, MarriageSummary, NewsCarousel, NewsQuery, PrayerSchedule,
    QiblaQuery, QiblaResponse, ServiceDirectory, ServiceQuery, StaffDashboard, StaffQuery, ThemeQuery, WorshipQuery,
    WorshipSummary,
};
use crate::news::{carousel, headlines, NewsPayload};
use crate::prayer::{calendar_query, schedule, Calendar};
use crate::qibla::compass;
use crate::record::Record;
use crate::services::{directory, ASTA_PROTAS, CONTACT};
use crate::state::AppState;
use crate::stats::{build_stats, selection, StaffChart};
use crate::storage::DataEnvelope;
use crate::ui::render_index;
use crate::worship::{self, WorshipKind};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use tracing::{error, warn};

const INSTITUTIONS_ASSET: &str = "Daftar_Lembaga.json";
const HEADCOUNT_ASSET: &str = "tenaga_pendidik.json";
const MARRIAGE_ASSET: &str = "nikah.json";

pub async fn index(State(state): State<AppState>, Query(query): Query<ThemeQuery>) -> Html<String> {
    let theme = state.settings.theme_or_default(query.theme.as_deref());
    let items = match state.upstream.fetch_json::<NewsPayload>(&state.settings.news, &[]).await {
        Ok(payload) => payload.into_items(),
        Err(err) => {
            warn!("headlines unavailable: {err}");
            Vec::new()
        }
    };
    Html(render_index(theme, &headlines(&items), &ASTA_PROTAS, &CONTACT))
}

pub async fn staff(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> Result<Json<StaffDashboard>, AppError> {
    let records = load_staff(&state).await?;
    Ok(Json(build_stats(&records, &query)))
}

pub async fn staff_export(State(state): State<AppState>, Query(query): Query<StaffQuery>) -> Result<Response, AppError> {
    let records = load_staff(&state).await?;
    let filtered = selection(&query).apply(&records);
    Ok(download(records_csv("data_pegawai.csv", &filtered)))
}

/// `/api/staff/chart/<slug>.<csv|png>` for one dashboard chart.
pub async fn staff_chart(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(query): Query<StaffQuery>,
) -> Result<Response, AppError> {
    let (slug, extension) = file
        .rsplit_once('.')
        .ok_or_else(|| AppError::not_found(format!("unknown chart export '{file}'")))?;
    let chart = StaffChart::from_slug(slug).ok_or_else(|| AppError::not_found(format!("unknown chart '{slug}'")))?;
    if !matches!(extension, "csv" | "png") {
        return Err(AppError::not_found(format!("unsupported export format '{extension}'")));
    }

    let records = load_staff(&state).await?;
    let data = chart.build(&selection(&query).apply(&records));
    let filename = format!("{}.{extension}", chart.slug());
    if extension == "csv" {
        return Ok(download(chart_csv(&filename, &data)));
    }

    let theme = state.settings.theme_or_default(query.theme.as_deref());
    let kind = chart.kind();
    let rendered = tokio::task::spawn_blocking(move || chart_png(&filename, &data, kind, theme))
        .await
        .map_err(AppError::internal)?;
    match rendered {
        Ok(file) => Ok(download(file)),
        Err(err) => {
            error!("chart export failed: {err}");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

pub async fn institutions(
    State(state): State<AppState>,
    Query(query): Query<InstitutionQuery>,
) -> Result<Json<InstitutionSummary>, AppError> {
    let (rows, headcounts) = load_institutions(&state).await?;
    Ok(Json(institutions::build_summary(&rows, &headcounts, &query)))
}

pub async fn institutions_export(
    State(state): State<AppState>,
    Query(query): Query<InstitutionQuery>,
) -> Result<Response, AppError> {
    let (rows, headcounts) = load_institutions(&state).await?;
    let summary = institutions::build_summary(&rows, &headcounts, &query);
    Ok(download(records_csv("daftar_lembaga.csv", &summary.institutions)))
}

pub async fn worship(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<WorshipQuery>,
) -> Result<Json<WorshipSummary>, AppError> {
    let kind = worship_kind(&kind)?;
    let places = load_worship(&state, kind).await?;
    Ok(Json(worship::build_summary(kind, &places, &query)))
}

pub async fn worship_export(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<WorshipQuery>,
) -> Result<Response, AppError> {
    let kind = worship_kind(&kind)?;
    let places = load_worship(&state, kind).await?;
    let summary = worship::build_summary(kind, &places, &query);
    Ok(download(records_csv(&format!("{}.csv", kind.slug()), &summary.places)))
}

pub async fn marriage(State(state): State<AppState>) -> Result<Json<MarriageSummary>, AppError> {
    let file: MarriageFile = state
        .upstream
        .fetch_json(&state.settings.asset(MARRIAGE_ASSET), &[])
        .await?;
    Ok(Json(marriage::build_summary(&file.into_records())))
}

pub async fn news(State(state): State<AppState>, Query(query): Query<NewsQuery>) -> Result<Json<NewsCarousel>, AppError> {
    let payload: NewsPayload = state.upstream.fetch_json(&state.settings.news, &[]).await?;
    Ok(Json(carousel(&payload.into_items(), query.start.unwrap_or(0))))
}

pub async fn locations(State(state): State<AppState>) -> Result<Json<MapView>, AppError> {
    let envelope: DataEnvelope = state.upstream.fetch_json(&state.settings.locations, &[]).await?;
    Ok(Json(map_view(envelope)))
}

pub async fn qibla(Query(query): Query<QiblaQuery>) -> Result<Json<QiblaResponse>, AppError> {
    compass(query.lat, query.lon, query.heading)
        .map(Json)
        .map_err(|err| AppError::bad_request(err.to_string()))
}

pub async fn prayer_times(State(state): State<AppState>) -> Result<Json<PrayerSchedule>, AppError> {
    let now = Local::now().naive_local();
    let query = calendar_query(&state.settings.prayer_location, now.date());
    let calendar: Calendar = state.upstream.fetch_json(&state.settings.prayer, &query).await?;
    Ok(Json(schedule(&calendar, now)))
}

pub async fn services(Query(query): Query<ServiceQuery>) -> Json<ServiceDirectory> {
    Json(directory(query.satker.as_deref()))
}

pub async fn contact() -> Json<Contact> {
    Json(CONTACT)
}

async fn load_staff(state: &AppState) -> Result<Vec<Record>, AppError> {
    let envelope: DataEnvelope = state.upstream.fetch_json(&state.settings.staff, &[]).await?;
    Ok(envelope.data)
}

async fn load_institutions(state: &AppState) -> Result<(Vec<Record>, Vec<Record>), AppError> {
    let raw: Vec<Record> = state
        .upstream
        .fetch_json(&state.settings.asset(INSTITUTIONS_ASSET), &[])
        .await?;
    let headcounts = state
        .upstream
        .fetch_optional(&state.settings.asset(HEADCOUNT_ASSET))
        .await;
    Ok((public_rows(&raw), headcounts))
}

async fn load_worship(state: &AppState, kind: WorshipKind) -> Result<Vec<Record>, AppError> {
    let rows = state.upstream.fetch_csv(&state.settings.asset(kind.asset())).await?;
    Ok(kind.shape(rows))
}

fn worship_kind(slug: &str) -> Result<WorshipKind, AppError> {
    WorshipKind::from_slug(slug).ok_or_else(|| AppError::not_found(format!("unknown place of worship '{slug}'")))
}

/// Attachment response, or 204 when there was nothing to export.
fn download(file: Option<ExportFile>) -> Response {
    let Some(file) = file else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}
