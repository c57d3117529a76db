use crate::models::{Contact, Service, ServiceDirectory};

struct Unit {
    name: &'static str,
    tugas_dan_fungsi: &'static str,
    layanan: &'static str,
    sop: &'static str,
    ikm: &'static str,
}

const UNITS: [Unit; 6] = [
    Unit {
        name: "Sekjen",
        tugas_dan_fungsi: "Menyelenggarakan koordinasi pelaksanaan tugas, pembinaan, dan pemberian dukungan administrasi kepada seluruh unit organisasi di lingkungan Kementerian Agama.",
        layanan: "Pelayanan administrasi umum, keuangan, dan kepegawaian.",
        sop: "Prosedur standar untuk pengelolaan administrasi dan pelaporan keuangan.",
        ikm: "Indeks Kepuasan Masyarakat: 85%",
    },
    Unit {
        name: "Pendidikan",
        tugas_dan_fungsi: "Menyelenggarakan pembinaan dan pengembangan pendidikan agama dan keagamaan.",
        layanan: "Pelayanan pendidikan madrasah, pesantren, dan kursus keagamaan.",
        sop: "Prosedur standar untuk akreditasi dan kurikulum pendidikan.",
        ikm: "Indeks Kepuasan Masyarakat: 90%",
    },
    Unit {
        name: "Bimas Islam",
        tugas_dan_fungsi: "Menyelenggarakan pembinaan masyarakat Islam dalam bidang keagamaan.",
        layanan: "Pelayanan nikah, talak, rujuk, dan pembinaan keluarga sakinah.",
        sop: "Prosedur standar untuk pelayanan nikah dan pembinaan keluarga.",
        ikm: "Indeks Kepuasan Masyarakat: 88%",
    },
    Unit {
        name: "Penyelenggara Bimas Kristen",
        tugas_dan_fungsi: "Menyelenggarakan pembinaan masyarakat Kristen dalam bidang keagamaan.",
        layanan: "Pelayanan pembinaan umat Kristen dan pendidikan keagamaan Kristen.",
        sop: "Prosedur standar untuk pembinaan rohani dan kegiatan keagamaan.",
        ikm: "Indeks Kepuasan Masyarakat: 87%",
    },
    Unit {
        name: "Penyelenggara Zakat Wakaf",
        tugas_dan_fungsi: "Menyelenggarakan pengelolaan dan pembinaan zakat serta wakaf.",
        layanan: "Pelayanan pengelolaan zakat, wakaf, dan sertifikasi tanah wakaf.",
        sop: "Prosedur standar untuk pengelolaan zakat dan wakaf.",
        ikm: "Indeks Kepuasan Masyarakat: 89%",
    },
    Unit {
        name: "Katolik",
        tugas_dan_fungsi: "Menyelenggarakan pembinaan masyarakat Katolik dalam bidang keagamaan.",
        layanan: "Pelayanan pembinaan umat Katolik dan pendidikan keagamaan Katolik.",
        sop: "Prosedur standar untuk pembinaan rohani dan kegiatan keagamaan.",
        ikm: "Indeks Kepuasan Masyarakat: 86%",
    },
];

pub const CONTACT: Contact = Contact {
    address: "Jalan Perintis Kemerdekaan, Lima Puluh Kota, Batu Bara, Sumatera Utara",
    email: "kemenagbatubara@gmail.com",
    phone: "(0622) 96408",
};

/// Programme titles shown on the landing page.
pub const ASTA_PROTAS: [&str; 8] = [
    "Peningkatan Kerukunan dan Cinta Kemanusiaan",
    "Penguatan Ekoteologi",
    "Layanan Keagamaan Berdampak",
    "Mewujudkan Pendidikan Unggul, Ramah, dan Terintegrasi",
    "Pemberdayaan Pesantren",
    "Pemberdayaan Ekonomi Umat",
    "Sukses Haji",
    "Digitalisasi Tata Kelola",
];

/// Lowercase name with each whitespace run collapsed to a hyphen.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn service(unit: &Unit) -> Service {
    Service {
        name: unit.name,
        slug: slugify(unit.name),
        tugas_dan_fungsi: unit.tugas_dan_fungsi,
        layanan: unit.layanan,
        sop: unit.sop,
        ikm: unit.ikm,
    }
}

pub fn all() -> Vec<Service> {
    UNITS.iter().map(service).collect()
}

/// Every unit plus the one named by `satker`; an unknown or absent slug
/// selects the first unit.
pub fn directory(satker: Option<&str>) -> ServiceDirectory {
    let services = all();
    let selected = satker
        .and_then(|slug| services.iter().find(|service| service.slug == slug))
        .or(services.first())
        .cloned()
        .unwrap_or_else(|| service(&UNITS[0]));
    ServiceDirectory { services, selected }
}
