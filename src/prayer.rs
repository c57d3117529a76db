//! Daily prayer schedule and the countdown to the next prayer, read from a
//! monthly prayer-time calendar.

use crate::config::PrayerLocation;
use crate::models::{NextPrayer, PrayerSchedule, PrayerSlot};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;

/// Calendar keys with their local names, in the order they fall in a day.
pub const PRAYERS: [(&str, &str); 5] = [
    ("Fajr", "Subuh"),
    ("Dhuhr", "Dzuhur"),
    ("Asr", "Ashar"),
    ("Maghrib", "Maghrib"),
    ("Isha", "Isya"),
];

const MISSING: &str = "-";

#[derive(Debug, Default, Deserialize)]
pub struct Calendar {
    #[serde(default)]
    pub data: Vec<CalendarDay>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarDay {
    #[serde(default)]
    pub timings: HashMap<String, String>,
    #[serde(default)]
    pub date: Option<CalendarDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarDate {
    pub readable: Option<String>,
}

impl Calendar {
    fn day(&self, index: usize) -> Option<&CalendarDay> {
        self.data.get(index)
    }
}

impl CalendarDay {
    /// Clock part of a timing such as `04:52 (WIB)`.
    fn clock(&self, key: &str) -> Option<&str> {
        self.timings
            .get(key)
            .and_then(|value| value.split(' ').next())
            .filter(|value| !value.is_empty())
    }
}

/// Query pairs for the calendar of the month containing `date`.
pub fn calendar_query(location: &PrayerLocation, date: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("method", location.method.to_string()),
        ("month", date.month().to_string()),
        ("year", date.year().to_string()),
    ]
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let clock = value.split(' ').next()?;
    let (hours, minutes) = clock.split_once(':')?;
    NaiveTime::from_hms_opt(hours.trim().parse().ok()?, minutes.trim().parse().ok()?, 0)
}

fn today_index(now: NaiveDateTime) -> usize {
    now.day0() as usize
}

fn countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
}

/// First prayer still ahead of `now`; after Isya, tomorrow's Subuh. At month
/// end tomorrow's time is taken from today's row.
pub fn next_prayer(calendar: &Calendar, now: NaiveDateTime) -> Option<NextPrayer> {
    if calendar.data.is_empty() {
        return None;
    }
    let index = today_index(now);
    let upcoming = calendar.day(index).and_then(|today| {
        PRAYERS.iter().find_map(|(key, label)| {
            let at = now.date().and_time(parse_time(today.clock(key)?)?);
            (at > now).then_some((*key, *label, at))
        })
    });

    let (key, label, at) = match upcoming {
        Some(found) => found,
        None => {
            let next_index = if index + 1 < calendar.data.len() { index + 1 } else { index };
            let fajr = parse_time(calendar.day(next_index)?.clock("Fajr")?)?;
            let (key, label) = PRAYERS[0];
            (key, label, now.date().succ_opt()?.and_time(fajr))
        }
    };

    Some(NextPrayer {
        key,
        label,
        at: at.format("%Y-%m-%d %H:%M").to_string(),
        countdown: countdown((at - now).num_seconds()),
    })
}

pub fn schedule(calendar: &Calendar, now: NaiveDateTime) -> PrayerSchedule {
    let today = calendar.day(today_index(now));
    let timings = PRAYERS
        .iter()
        .map(|&(key, label)| PrayerSlot {
            key,
            label,
            time: today
                .and_then(|day| day.clock(key))
                .unwrap_or(MISSING)
                .to_string(),
        })
        .collect();
    let date = today
        .and_then(|day| day.date.as_ref())
        .and_then(|date| date.readable.clone())
        .unwrap_or_else(|| now.format("%d %b %Y").to_string());

    PrayerSchedule {
        date,
        timings,
        next: next_prayer(calendar, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn calendar() -> Calendar {
        serde_json::from_str(
            r#"{"data":[
                {"timings":{"Fajr":"04:50 (WIB)","Dhuhr":"12:10 (WIB)","Asr":"15:20 (WIB)","Maghrib":"18:15 (WIB)","Isha":"19:25 (WIB)"},"date":{"readable":"01 Oct 2026"}},
                {"timings":{"Fajr":"04:49 (WIB)","Dhuhr":"12:10 (WIB)","Asr":"15:19 (WIB)","Maghrib":"18:14 (WIB)","Isha":"19:24 (WIB)"},"date":{"readable":"02 Oct 2026"}}
            ]}"#,
        )
        .unwrap()
    }

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn timings_drop_timezone_suffix() {
        assert_eq!(parse_time("04:52 (WIB)"), NaiveTime::from_hms_opt(4, 52, 0));
        assert_eq!(parse_time("late"), None);
    }

    #[test]
    fn next_prayer_later_today() {
        let next = next_prayer(&calendar(), at(1, 12, 30, 0)).unwrap();
        assert_eq!(next.label, "Ashar");
        assert_eq!(next.at, "2026-10-01 15:20");
        assert_eq!(next.countdown, "02:50:00");
    }

    #[test]
    fn after_isya_waits_for_tomorrows_subuh() {
        let next = next_prayer(&calendar(), at(1, 21, 0, 30)).unwrap();
        assert_eq!(next.key, "Fajr");
        assert_eq!(next.at, "2026-10-02 04:49");
        assert_eq!(next.countdown, "07:48:30");
    }

    #[test]
    fn month_end_reuses_todays_subuh() {
        let next = next_prayer(&calendar(), at(2, 20, 0, 0)).unwrap();
        assert_eq!(next.at, "2026-10-03 04:49");
    }

    #[test]
    fn schedule_lists_todays_times() {
        let schedule = schedule(&calendar(), at(2, 6, 0, 0));
        assert_eq!(schedule.date, "02 Oct 2026");
        assert_eq!(schedule.timings[0].time, "04:49");
        assert_eq!(schedule.timings[4].label, "Isya");
        assert_eq!(schedule.next.unwrap().label, "Dzuhur");
    }

    #[test]
    fn missing_day_shows_placeholders() {
        let schedule = schedule(&calendar(), at(15, 6, 0, 0));
        assert!(schedule.timings.iter().all(|slot| slot.time == "-"));
        assert_eq!(schedule.next, None);
    }

    #[test]
    fn query_targets_the_current_month() {
        let query = calendar_query(&PrayerLocation::default(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(query[3], ("month", "10".to_string()));
        assert_eq!(query[4], ("year", "2026".to_string()));
    }
}
