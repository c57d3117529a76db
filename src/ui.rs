use crate::config::Theme;
use crate::models::Contact;

/// Minimal escaping for text placed inside HTML elements.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

fn list_items(items: impl IntoIterator<Item = impl AsRef<str>>, class: &str) -> String {
    items
        .into_iter()
        .map(|item| format!(r#"<li class="{class}">{}</li>"#, escape_html(item.as_ref())))
        .collect::<Vec<_>>()
        .join("\n        ")
}

pub fn render_index(theme: Theme, headlines: &[String], programmes: &[&str], contact: &Contact) -> String {
    // The ticker scrolls two copies back to back so it loops without a gap.
    let ticker = list_items(headlines.iter().chain(headlines.iter()), "ticker-item");
    let other = match theme {
        Theme::Dark => Theme::Light,
        Theme::Light => Theme::Dark,
    };
    INDEX_HTML
        .replace("{{THEME}}", theme.as_str())
        .replace("{{OTHER_THEME}}", other.as_str())
        .replace("{{PROGRAMMES}}", &list_items(programmes.iter(), "programme"))
        .replace("{{ADDRESS}}", &escape_html(contact.address))
        .replace("{{EMAIL}}", &escape_html(contact.email))
        .replace("{{PHONE}}", &escape_html(contact.phone))
        // Headlines come from the news feed, so they go in after every other placeholder.
        .replace("{{TICKER}}", &ticker)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="id">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Kementerian Agama Kabupaten Batu Bara</title>
  <style>
    :root {
      --accent: #22c55e;
      --accent-2: #3b82f6;
    }

    body[data-theme="dark"] {
      --bg: #0b0f0d;
      --card: #111827;
      --ink: #f3f4f6;
      --muted: #9ca3af;
      --line: #1f2937;
    }

    body[data-theme="light"] {
      --bg: #f9fafb;
      --card: #ffffff;
      --ink: #111827;
      --muted: #4b5563;
      --line: #e5e7eb;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    .ticker {
      position: sticky;
      top: 0;
      display: flex;
      gap: 18px;
      align-items: center;
      overflow: hidden;
      padding: 10px 18px;
      background: var(--card);
      border-bottom: 1px solid var(--line);
      font-size: 0.9rem;
    }

    .ticker .clock {
      font-variant-numeric: tabular-nums;
      white-space: nowrap;
      color: var(--accent);
    }

    .ticker ul {
      display: inline-flex;
      gap: 48px;
      margin: 0;
      padding: 0;
      list-style: none;
      white-space: nowrap;
      animation: ticker 60s linear infinite;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 32px 18px 48px;
      display: grid;
      gap: 28px;
    }

    .hero h1 {
      margin: 0 0 8px;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
    }

    .hero p {
      margin: 0;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat,
    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 18px;
    }

    .stat .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      display: block;
      margin-top: 6px;
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent);
    }

    .programmes {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 12px;
      margin: 0;
      padding: 0;
      list-style: none;
    }

    .programme {
      background: var(--card);
      border-left: 4px solid var(--accent);
      border-radius: 12px;
      padding: 14px;
    }

    a {
      color: var(--accent-2);
    }

    .links {
      columns: 2 240px;
    }

    .status[data-type="error"] {
      color: #ef4444;
    }

    @keyframes ticker {
      from {
        transform: translateX(0);
      }
      to {
        transform: translateX(-50%);
      }
    }
  </style>
</head>
<body data-theme="{{THEME}}">
  <div class="ticker">
    <span class="clock" id="next-prayer">--:--:--</span>
    <ul>
        {{TICKER}}
    </ul>
  </div>

  <main>
    <section class="hero">
      <h1>Kementerian Agama Kabupaten Batu Bara</h1>
      <p>Zona Integritas menuju Wilayah Bebas dari Korupsi dan Wilayah Birokrasi Bersih dan Melayani.</p>
      <p><a href="/?theme={{OTHER_THEME}}">Tema {{OTHER_THEME}}</a></p>
    </section>

    <section class="panel" id="staff">
      <div class="stat"><span class="label">Total Pegawai</span><span class="value" id="total">-</span></div>
      <div class="stat"><span class="label">PNS</span><span class="value" id="pns">-</span></div>
      <div class="stat"><span class="label">Non PNS</span><span class="value" id="non-pns">-</span></div>
      <div class="stat"><span class="label">Satuan Kerja</span><span class="value" id="units">-</span></div>
    </section>
    <p class="status" id="status"></p>

    <section>
      <h2>Asta Protas</h2>
      <ul class="programmes">
        {{PROGRAMMES}}
      </ul>
    </section>

    <section class="card">
      <h2>Data</h2>
      <ul class="links">
        <li><a href="/api/staff">Kepegawaian</a> (<a href="/api/staff/export.csv">CSV</a>)</li>
        <li><a href="/api/staff/chart/masa-kerja.png?theme={{THEME}}">Grafik masa kerja</a></li>
        <li><a href="/api/institutions">Lembaga pendidikan</a> (<a href="/api/institutions/export.csv">CSV</a>)</li>
        <li><a href="/api/worship/masjid">Masjid</a> (<a href="/api/worship/masjid/export.csv">CSV</a>)</li>
        <li><a href="/api/worship/gereja">Gereja</a> (<a href="/api/worship/gereja/export.csv">CSV</a>)</li>
        <li><a href="/api/marriage">Pernikahan</a></li>
        <li><a href="/api/news">Berita</a></li>
        <li><a href="/api/locations">Lokasi satuan kerja</a></li>
        <li><a href="/api/prayer-times">Jadwal sholat</a></li>
        <li><a href="/api/qibla?lat=3.171246705&amp;lon=99.42034917">Arah kiblat</a></li>
        <li><a href="/api/services">Layanan</a></li>
      </ul>
    </section>

    <section class="card">
      <h2>Kontak</h2>
      <p>{{ADDRESS}}</p>
      <p>Email: {{EMAIL}}<br />Telepon: {{PHONE}}</p>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const nextPrayerEl = document.getElementById('next-prayer');

    const loadStaff = async () => {
      const res = await fetch('/api/staff');
      if (!res.ok) {
        throw new Error(await res.text());
      }
      const { statistics } = await res.json();
      document.getElementById('total').textContent = statistics.total;
      document.getElementById('pns').textContent = statistics.pns;
      document.getElementById('non-pns').textContent = statistics.non_pns;
      document.getElementById('units').textContent = statistics.satuan_kerja;
    };

    const loadPrayer = async () => {
      const res = await fetch('/api/prayer-times');
      if (!res.ok) {
        return;
      }
      const { next } = await res.json();
      if (next) {
        nextPrayerEl.textContent = `${next.label} ${next.countdown}`;
      }
    };

    loadStaff().catch((err) => {
      statusEl.textContent = err.message;
      statusEl.dataset.type = 'error';
    });
    loadPrayer();
    setInterval(loadPrayer, 30000);
  </script>
</body>
</html>
"#;
