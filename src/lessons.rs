//! Filtering and projection of raw spreadsheet rows into lesson records.
//!
//! Column positions are fixed by the layout of the lessons and reservations
//! sheets and must stay in sync with them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Tokyo;

use crate::models::Lesson;

pub const LESSON_DATE: usize = 1;
pub const LESSON_TIME: usize = 2;
pub const LESSON_GROUP: usize = 3;
pub const LESSON_LOCATION: usize = 4;
pub const LESSON_SONG: usize = 7;
pub const LESSON_ID: usize = 14;

pub const RESERVATION_PARTICIPANT_NAME: usize = 2;
pub const RESERVATION_LESSON_ID: usize = 10;

/// Group value marking a reserve slot rather than a bookable lesson.
pub const PLACEHOLDER_GROUP: &str = "予備";

const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}

fn cell_or_empty(row: &[String], index: usize) -> String {
    cell(row, index).unwrap_or_default().to_string()
}

/// Calendar date on a Japanese wall clock at instant `now`.
pub fn japan_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Tokyo).date_naive()
}

/// Current calendar date in Japan, independent of the host timezone.
pub fn today_in_japan() -> NaiveDate {
    japan_date(Utc::now())
}

/// Parses a lesson date cell, ignoring any time-of-day suffix.
pub fn parse_lesson_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn project_lesson(row: &[String]) -> Lesson {
    Lesson {
        lesson_id: cell_or_empty(row, LESSON_ID),
        date: cell_or_empty(row, LESSON_DATE),
        time: cell_or_empty(row, LESSON_TIME),
        group: cell_or_empty(row, LESSON_GROUP),
        location: cell_or_empty(row, LESSON_LOCATION),
        song: cell_or_empty(row, LESSON_SONG),
    }
}

fn is_upcoming(row: &[String], today: NaiveDate) -> bool {
    let on_or_after_today = cell(row, LESSON_DATE)
        .and_then(parse_lesson_date)
        .is_some_and(|date| date >= today);
    let has_song = cell(row, LESSON_SONG).is_some_and(|song| !song.is_empty());
    let is_placeholder = cell(row, LESSON_GROUP) == Some(PLACEHOLDER_GROUP);

    on_or_after_today && has_song && !is_placeholder
}

/// Lessons dated on or after `today` that have a song and are not reserve
/// slots, in sheet order.
pub fn upcoming_lessons(rows: &[Vec<String>], today: NaiveDate) -> Vec<Lesson> {
    rows.iter()
        .filter(|row| is_upcoming(row, today))
        .map(|row| project_lesson(row))
        .collect()
}

pub fn find_lesson(rows: &[Vec<String>], lesson_id: &str) -> Option<Lesson> {
    rows.iter()
        .find(|row| cell(row, LESSON_ID) == Some(lesson_id))
        .map(|row| project_lesson(row))
}

pub fn collect_participants(rows: &[Vec<String>], lesson_id: &str) -> Vec<String> {
    rows.iter()
        .filter(|row| cell(row, RESERVATION_LESSON_ID) == Some(lesson_id))
        .map(|row| cell_or_empty(row, RESERVATION_PARTICIPANT_NAME))
        .collect()
}
