//! Due-date extraction from free-text action items.
//!
//! A fixed, ordered list of patterns locates a date phrase; the first
//! pattern that matches anywhere in the text wins. The matched phrase is
//! then handed to a small fuzzy parser that understands month names,
//! ordinals and the two numeric layouts. Anything that fails along the way
//! collapses into [`DueDate::NotFound`].

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Outcome of looking for a deadline in an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum DueDate {
    Found(NaiveDate),
    NotFound,
}

impl DueDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DueDate::Found(date) => Some(*date),
            DueDate::NotFound => None,
        }
    }
}

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

fn date_phrase() -> String {
    let month_first =
        format!(r"\b{MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b");
    let day_first =
        format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\b(?:,?\s+\d{{4}})?");
    format!("(?:{month_first}|{day_first})")
}

/// Patterns in priority order. Capture group 1 is the phrase to parse.
static DUE_DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let phrase = date_phrase();
    [
        format!(r"(?i)\bby\s+({phrase})"),
        format!(r"(?i)({phrase})"),
        r"\b(\d{1,2}/\d{1,2}/\d{4})\b".to_string(),
        r"\b(\d{4}-\d{2}-\d{2})\b".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("due-date pattern is valid"))
    .collect()
});

/// Locate and resolve a deadline mentioned in `description`.
///
/// Never fails: a phrase that matches a pattern but does not parse into a
/// real calendar date is reported as `NotFound`, same as no match at all.
pub fn extract_due_date(description: &str, now: NaiveDateTime) -> DueDate {
    let Some(phrase) = first_date_phrase(description) else {
        return DueDate::NotFound;
    };

    match parse_date_phrase(phrase).and_then(|parsed| parsed.resolve(now)) {
        Ok(date) => DueDate::Found(date),
        Err(reason) => {
            tracing::debug!(phrase, reason, "ignoring unparseable date phrase");
            DueDate::NotFound
        }
    }
}

fn first_date_phrase(description: &str) -> Option<&str> {
    DUE_DATE_PATTERNS.iter().find_map(|re| {
        re.captures(description)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Date components recovered from a phrase, before the year is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedDate {
    year: Option<i32>,
    month: u32,
    day: u32,
}

impl ParsedDate {
    /// Turn into a concrete date. A phrase without a year lands in the
    /// current year, or the next one if that date is already behind `now`.
    fn resolve(self, now: NaiveDateTime) -> Result<NaiveDate, &'static str> {
        if let Some(year) = self.year {
            return NaiveDate::from_ymd_opt(year, self.month, self.day)
                .ok_or("no such calendar date");
        }

        let this_year = NaiveDate::from_ymd_opt(now.year(), self.month, self.day)
            .ok_or("no such calendar date this year")?;
        if this_year.and_time(chrono::NaiveTime::MIN) < now {
            NaiveDate::from_ymd_opt(now.year() + 1, self.month, self.day)
                .ok_or("no such calendar date next year")
        } else {
            Ok(this_year)
        }
    }
}

fn month_from_name(token: &str) -> Option<u32> {
    const NAMES: [&str; 12] = [
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december",
    ];
    if token.len() < 3 {
        return None;
    }
    NAMES
        .iter()
        .position(|name| name.starts_with(token))
        .map(|idx| idx as u32 + 1)
}

fn strip_ordinal(token: &str) -> &str {
    ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(token)
}

/// Fuzzy parse of a date phrase such as `December 20th, 2024`,
/// `3rd of March`, `12/20/2024` or `2024-12-20`.
///
/// Numeric layouts follow US order (month first) unless the phrase starts
/// with a four-digit year.
fn parse_date_phrase(phrase: &str) -> Result<ParsedDate, &'static str> {
    let lowered = phrase.to_ascii_lowercase();
    let mut month_name = None;
    let mut numbers: Vec<&str> = Vec::new();

    for token in lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let token = strip_ordinal(token);
        if token.chars().all(|c| c.is_ascii_digit()) {
            numbers.push(token);
        } else if let Some(month) = month_from_name(token) {
            month_name.get_or_insert(month);
        } else if token != "of" {
            return Err("unrecognised token");
        }
    }

    let parse = |s: &str| s.parse::<u32>().map_err(|_| "number out of range");

    match month_name {
        Some(month) => {
            let mut year = None;
            let mut day = None;
            for n in numbers {
                if n.len() == 4 && year.is_none() {
                    year = Some(parse(n)? as i32);
                } else if day.is_none() {
                    day = Some(parse(n)?);
                } else {
                    return Err("too many numbers");
                }
            }
            Ok(ParsedDate {
                year,
                month,
                day: day.ok_or("missing day")?,
            })
        }
        None => match numbers.as_slice() {
            [y, m, d] if y.len() == 4 => Ok(ParsedDate {
                year: Some(parse(y)? as i32),
                month: parse(m)?,
                day: parse(d)?,
            }),
            [m, d, y] if y.len() == 4 => Ok(ParsedDate {
                year: Some(parse(y)? as i32),
                month: parse(m)?,
                day: parse(d)?,
            }),
            _ => Err("unsupported numeric layout"),
        },
    }
}
