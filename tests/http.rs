use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::time::sleep;

const STAFF: &str = r#"{"data":[
    {"NAMA":"Ahmad","Golongan":"III","STATUS PEGAWAI":"PNS","MK_TAHUN":"7","Satuan Kerja":"MAN 1 Batu Bara","Generasi":"Milenial","JENJANG_PENDIDIKAN":"S1"},
    {"NAMA":"Butet","Golongan":"III","STATUS PEGAWAI":"PPPK","MK_TAHUN":"2","Satuan Kerja":"MAN 1 Batu Bara","Generasi":"Gen Z","JENJANG_PENDIDIKAN":"S1"},
    {"NAMA":"Citra","Golongan":"IV","STATUS PEGAWAI":"PNS","MK_TAHUN":"21","Satuan Kerja":"KUA Talawi","Generasi":"Gen X","JENJANG_PENDIDIKAN":"S2"}
]}"#;

const NEWS: &str = r#"{"results":[
    {"title":"Rapat koordinasi penyuluh agama","category":"Berita","date":"2026-10-01"},
    {"title":"Pembinaan keluarga sakinah","category":"Kegiatan"}
]}"#;

const LOCATIONS: &str = r#"{"success":true,"data":[
    {"SATUAN KERJA":"Kantor Kemenag","LATITUDE":"3.17","LONGITUDE":"99.42"},
    {"SATUAN KERJA":"KUA Talawi","LATITUDE":"3.25","LONGITUDE":"99.50"}
]}"#;

const PRAYER: &str = r#"{"data":[
    {"timings":{"Fajr":"04:50 (WIB)","Dhuhr":"12:10 (WIB)","Asr":"15:20 (WIB)","Maghrib":"18:15 (WIB)","Isha":"19:25 (WIB)"},"date":{"readable":"01 Oct 2026"}}
]}"#;

const INSTITUTIONS: &str = r#"[
    {"NSM":"111","NPSN":"9001","Nama Madrasah":"MIS Al-Ikhlas","Jenjang":"mi","Status":"Swasta","Kecamatan":"Talawi","Telepon":"0812"},
    {"NSM":"112","NPSN":"9002","Nama Madrasah":"MTsN 1 Batu Bara","Jenjang":"MTs","Status":"Negeri","Kecamatan":"Lima Puluh"}
]"#;

const HEADCOUNTS: &str = r#"[{"NPSN":"9001","Jumlah Guru":12,"Jumlah Tendik":3}]"#;

const MOSQUES: &str = "Nama Masjid,Kecamatan,Tahun Berdiri,Status Tanah,Luas Tanah,Daya Tampung\n\
    Masjid Raya,Lima Puluh,1932,Wakaf,1200,500\n\
    Masjid Taqwa,Talawi,1985,Hak Milik,800,300\n";

const CHURCHES: &str = "NO,Nama Gereja,Kecamatan,status_gedung_gereja,Jumlah Jemaat\n\
    1,HKBP Indrapura,Air Putih,Permanen,320\n";

const MARRIAGES: &str = r#"[
    {"KUA":"KUA Talawi","Tanggal Nikah":"2026-01-10"},
    {"KUA":"KUA Talawi","Tanggal Nikah":"2026-02-14"}
]"#;

struct TestServer {
    base_url: String,
    child: Child,
    _fixtures: TempDir,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn write_fixtures(dir: &Path) {
    for (name, body) in [
        ("staff.json", STAFF),
        ("news.json", NEWS),
        ("locations.json", LOCATIONS),
        ("prayer.json", PRAYER),
        ("Daftar_Lembaga.json", INSTITUTIONS),
        ("tenaga_pendidik.json", HEADCOUNTS),
        ("masjid.csv", MOSQUES),
        ("gereja.csv", CHURCHES),
        ("nikah.json", MARRIAGES),
    ] {
        fs::write(dir.join(name), body).expect("write fixture");
    }
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/services")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

/// Starts the binary with every data source pointed at fixture files;
/// `staff_source` overrides the staff dataset.
async fn spawn_server(staff_source: Option<&str>) -> TestServer {
    let port = pick_free_port();
    let fixtures = tempfile::tempdir().expect("fixture dir");
    write_fixtures(fixtures.path());
    let file = |name: &str| fixtures.path().join(name).to_string_lossy().to_string();

    let child = Command::new(env!("CARGO_BIN_EXE_kemenag_portal"))
        .env("PORT", port.to_string())
        .env("STAFF_SOURCE", staff_source.map(str::to_string).unwrap_or_else(|| file("staff.json")))
        .env("NEWS_SOURCE", file("news.json"))
        .env("LOCATIONS_SOURCE", file("locations.json"))
        .env("PRAYER_SOURCE", file("prayer.json"))
        .env("PORTAL_DATA_DIR", fixtures.path())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        child,
        _fixtures: fixtures,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(None).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_json(client: &Client, url: String) -> Value {
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_staff_filter_narrows_statistics() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let all = get_json(&client, format!("{}/api/staff", server.base_url)).await;
    assert_eq!(all["statistics"]["total"], 3);
    assert_eq!(all["options"]["golongan"], serde_json::json!(["Semua", "III", "IV"]));

    let filtered = get_json(&client, format!("{}/api/staff?golongan=III", server.base_url)).await;
    assert_eq!(filtered["statistics"]["total"], 2);
    assert_eq!(filtered["statistics"]["pns"], 1);
    assert_eq!(filtered["statistics"]["non_pns"], 1);
    assert_eq!(filtered["statistics"]["satuan_kerja"], 1);

    let reset = get_json(&client, format!("{}/api/staff?golongan=Semua", server.base_url)).await;
    assert_eq!(reset["statistics"]["total"], 3);
}

#[tokio::test]
async fn http_staff_exports() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let csv = client
        .get(format!("{}/api/staff/export.csv?status=PNS", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(csv.status(), StatusCode::OK);
    assert!(csv.headers()["content-type"].to_str().unwrap().starts_with("text/csv"));
    assert!(csv.headers()["content-disposition"].to_str().unwrap().contains("attachment"));
    let body = csv.text().await.unwrap();
    assert!(body.starts_with("NAMA,Golongan,STATUS PEGAWAI"));
    assert_eq!(body.lines().count(), 3);

    let empty = client
        .get(format!("{}/api/staff/export.csv?golongan=II", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::NO_CONTENT);

    let png = client
        .get(format!("{}/api/staff/chart/masa-kerja.png?theme=light", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(png.status(), StatusCode::OK);
    let bytes = png.bytes().await.unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let chart_csv = client
        .get(format!("{}/api/staff/chart/generasi.csv", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(chart_csv.starts_with("Label,Jumlah"));

    let unknown = client
        .get(format!("{}/api/staff/chart/gaji.png", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_directories_read_static_assets() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let institutions = get_json(&client, format!("{}/api/institutions", server.base_url)).await;
    assert_eq!(institutions["total"], 2);
    assert_eq!(institutions["by_jenjang"]["labels"], serde_json::json!(["MI", "MTs"]));
    assert!(institutions["institutions"][0].get("Telepon").is_none());

    let mosques = get_json(&client, format!("{}/api/worship/masjid?kecamatan=Talawi", server.base_url)).await;
    assert_eq!(mosques["kind"], "masjid");
    assert_eq!(mosques["total"], 1);

    let churches = get_json(&client, format!("{}/api/worship/gereja", server.base_url)).await;
    assert_eq!(churches["total"], 1);

    let missing = client
        .get(format!("{}/api/worship/vihara", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let marriage = get_json(&client, format!("{}/api/marriage", server.base_url)).await;
    assert_eq!(marriage["monthly"]["labels"], serde_json::json!(["2026-01", "2026-02"]));
}

#[tokio::test]
async fn http_directory_exports() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let institutions = client
        .get(format!("{}/api/institutions/export.csv", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(institutions.status(), StatusCode::OK);
    assert!(institutions.headers()["content-type"].to_str().unwrap().starts_with("text/csv"));
    assert_eq!(
        institutions.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"daftar_lembaga.csv\""
    );
    let body = institutions.text().await.unwrap();
    assert!(body.starts_with("NSM,NPSN,Nama Madrasah,Jenjang"));
    assert!(!body.contains("Telepon"));
    assert_eq!(body.lines().count(), 3);

    let mosques = client
        .get(format!("{}/api/worship/masjid/export.csv?kecamatan=Talawi", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(mosques.status(), StatusCode::OK);
    assert_eq!(
        mosques.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"masjid.csv\""
    );
    let body = mosques.text().await.unwrap();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("Masjid Taqwa,Talawi,1985"));

    for route in ["institutions", "worship/gereja"] {
        let empty = client
            .get(format!("{}/api/{route}/export.csv?kecamatan=Tidak%20Ada", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT, "{route}");
    }
}

#[tokio::test]
async fn http_portal_widgets() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let news = get_json(&client, format!("{}/api/news?start=1", server.base_url)).await;
    assert_eq!(news["total"], 2);
    assert_eq!(news["next_start"], 0);
    assert_eq!(news["items"][0]["title"], "Pembinaan keluarga sakinah");

    let map = get_json(&client, format!("{}/api/locations", server.base_url)).await;
    assert_eq!(map["markers"].as_array().unwrap().len(), 2);

    let prayer = get_json(&client, format!("{}/api/prayer-times", server.base_url)).await;
    assert_eq!(prayer["timings"].as_array().unwrap().len(), 5);

    let qibla = get_json(&client, format!("{}/api/qibla?lat=3.17&lon=99.42", server.base_url)).await;
    let bearing = qibla["bearing"].as_f64().unwrap();
    assert!((285.0..300.0).contains(&bearing));

    let invalid = client
        .get(format!("{}/api/qibla?lat=95&lon=99.42", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let services = get_json(&client, format!("{}/api/services?satker=bimas-islam", server.base_url)).await;
    assert_eq!(services["selected"]["name"], "Bimas Islam");

    let contact = get_json(&client, format!("{}/api/contact", server.base_url)).await;
    assert_eq!(contact["phone"], "(0622) 96408");

    let page = client
        .get(format!("{}/?theme=light", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"data-theme="light""#));
    assert!(page.contains("Rapat koordinasi penyuluh agama"));
}

#[tokio::test]
async fn http_upstream_failure_is_bad_gateway() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server(Some("/nonexistent/staff.json")).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/staff", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.text().await.unwrap(),
        "Gagal memuat data. Silakan refresh halaman."
    );
}
