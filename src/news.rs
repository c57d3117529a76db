use crate::models::{NewsCarousel, NewsItem};
use crate::record::Record;
use serde::Deserialize;

/// Cards visible at once in the carousel.
pub const CARDS: usize = 5;

pub const DEFAULT_HEADLINES: [&str; 3] = [
    "Selamat datang di Kemenag Kab. Batu Bara",
    "Transparansi layanan dan peningkatan pelayanan publik",
    "Informasi terbaru dan pengumuman akan tampil di sini",
];

/// The search endpoint has answered with each of these shapes over time.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewsPayload {
    List(Vec<Record>),
    Results { results: Vec<Record> },
    Posts { posts: Vec<Record> },
}

impl NewsPayload {
    pub fn into_items(self) -> Vec<NewsItem> {
        let records = match self {
            Self::List(records) | Self::Results { results: records } | Self::Posts { posts: records } => records,
        };
        records.iter().map(news_item).collect()
    }
}

fn news_item(record: &Record) -> NewsItem {
    NewsItem {
        image: record.text("image"),
        title: record.text("title"),
        excerpt: record.text("excerpt"),
        category: record.text("category"),
        date: record.text("date"),
    }
}

/// Ticker lines: every titled item, or the welcome lines when none have titles.
pub fn headlines(items: &[NewsItem]) -> Vec<String> {
    let titles: Vec<String> = items.iter().filter_map(|item| item.title.clone()).collect();
    if titles.is_empty() {
        return DEFAULT_HEADLINES.iter().map(|line| line.to_string()).collect();
    }
    titles
}

/// Up to `CARDS` items starting at `start`, wrapping past the end.
pub fn carousel(items: &[NewsItem], start: usize) -> NewsCarousel {
    let total = items.len();
    let (start, next_start) = if total == 0 {
        (0, 0)
    } else {
        let start = start % total;
        (start, (start + 1) % total)
    };
    let window = items
        .iter()
        .cycle()
        .skip(start)
        .take(CARDS.min(total))
        .cloned()
        .collect();

    NewsCarousel {
        total,
        start,
        next_start,
        items: window,
        headlines: headlines(items),
    }
}
