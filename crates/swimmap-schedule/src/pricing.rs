//! Today's price from the structured pricing table, and price text
//! formatting for list rows and popups.

use chrono::{Datelike, NaiveDateTime};
use serde_json::{Map, Value};
use swimmap_core::Facility;

use crate::normalize::is_weekend;

/// Categories tried in order; each entry lists accepted key spellings.
/// Walk-in (free) swim is preferred over a day pass.
const CATEGORY_PREFERENCE: &[&[&str]] = &[
    &["자유수영", "free_swim", "walk_in"],
    &["일일권", "day_pass", "daily"],
];
const ADULT_KEYS: &[&str] = &["성인", "adult"];
const WEEKDAY_KEYS: &[&str] = &["평일", "weekday"];
const WEEKEND_KEYS: &[&str] = &["주말", "weekend"];

const PRICE_ON_REQUEST: &str = "문의";

/// Adult price for `now` from a `category → audience → price` table.
///
/// A flat number is returned as-is. A weekday/weekend pair yields the
/// entry for today's kind of day, then the weekday entry, then the first
/// entry present. Returns `None` when no category produces a value.
#[must_use]
pub fn today_price(pricing: &Value, now: NaiveDateTime) -> Option<u32> {
    let table = pricing.as_object()?;
    let weekend = is_weekend(now.weekday());

    CATEGORY_PREFERENCE.iter().find_map(|spellings| {
        let audiences = lookup(table, spellings)?.as_object()?;
        let adult = lookup(audiences, ADULT_KEYS)?;
        price_for_day(adult, weekend)
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, spellings: &[&str]) -> Option<&'a Value> {
    spellings.iter().find_map(|key| map.get(*key))
}

fn price_for_day(value: &Value, weekend: bool) -> Option<u32> {
    match value {
        Value::Object(pair) => {
            let today = if weekend {
                lookup(pair, WEEKEND_KEYS).and_then(price_value)
            } else {
                None
            };
            today
                .or_else(|| lookup(pair, WEEKDAY_KEYS).and_then(price_value))
                .or_else(|| pair.values().find_map(price_value))
        }
        other => price_value(other),
    }
}

/// A single price: a non-negative integer, or a numeric string such as
/// `"3,500"` / `"3500원"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn price_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => parse_price_text(s),
        _ => None,
    }
}

fn parse_price_text(raw: &str) -> Option<u32> {
    let trimmed = raw.trim().trim_end_matches('원').trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut digits = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ',' => {}
            _ => return None,
        }
    }
    digits.parse().ok()
}

/// Today's adult price for a facility: the structured table first, then
/// the legacy free-swim price when it is a plain number.
#[must_use]
pub fn facility_price(facility: &Facility, now: NaiveDateTime) -> Option<u32> {
    facility
        .pricing
        .as_ref()
        .and_then(|p| today_price(p, now))
        .or_else(|| facility.free_swim_price.as_ref().and_then(price_value))
}

/// `3500` → `"3,500원"`.
#[must_use]
pub fn format_won(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push('원');
    out
}

/// Display text for a legacy price field.
///
/// Absent or empty → `"문의"` (price on request); all-digit values are
/// formatted as won; anything else (prose like `"시간대별 상이"`) is shown
/// verbatim.
#[must_use]
pub fn format_price(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PRICE_ON_REQUEST.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => PRICE_ON_REQUEST.to_string(),
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.bytes().all(|b| b.is_ascii_digit()) {
                t.parse::<u32>().map_or_else(|_| t.to_string(), format_won)
            } else {
                t.to_string()
            }
        }
        Some(other) => price_value(other).map_or_else(|| other.to_string(), format_won),
    }
}
