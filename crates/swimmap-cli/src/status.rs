//! `status` command: open/closed state and today's price per facility.

use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, NaiveDateTime};
use swimmap_core::{
    amenity_badge, navigation_url, order_facilities, Facility, FacilityFilter, NavigationPlatform,
};
use swimmap_schedule::{
    facility_price, facility_status, facility_timetable, format_price, format_won,
};

const AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse `--at`, falling back to the local wall clock.
pub(crate) fn parse_at(at: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match at {
        Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), AT_FORMAT)
            .with_context(|| format!("invalid --at '{raw}', expected YYYY-MM-DD HH:MM")),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// Price column: today's structured price, else the legacy price text.
pub(crate) fn price_label(facility: &Facility, now: NaiveDateTime) -> String {
    facility_price(facility, now).map_or_else(
        || format_price(facility.free_swim_price.as_ref()),
        format_won,
    )
}

/// Load, order and filter facilities, then print one line each.
///
/// # Errors
///
/// Returns an error if the facilities file cannot be read or parsed.
pub(crate) fn run_status(
    path: &Path,
    now: NaiveDateTime,
    filter: FacilityFilter,
    details: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut facilities = swimmap_core::load_facilities(path)
        .with_context(|| format!("failed to load facilities from {}", path.display()))?;
    order_facilities(&mut facilities);
    let shown: Vec<&Facility> = facilities.iter().filter(|f| filter.matches(f)).collect();
    tracing::debug!(total = facilities.len(), shown = shown.len(), ?filter, "facilities loaded");

    if json {
        let rows: Vec<serde_json::Value> = shown
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let status = facility_status(f, now);
                serde_json::json!({
                    "index": i + 1,
                    "name": f.name,
                    "status": status.status,
                    "text": status.text,
                    "price": price_label(f, now),
                    "distance": f.distance,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("no facilities match filter {filter:?}");
        return Ok(());
    }

    println!(
        "{:<4}{:<28}{:<14}{:<22}TODAY",
        "#", "NAME", "STATUS", "TEXT"
    );
    for (i, facility) in shown.iter().enumerate() {
        let status = facility_status(facility, now);
        println!(
            "{:<4}{:<28}{:<14}{:<22}{}",
            i + 1,
            truncate(&facility.name, 26),
            status.status.as_str(),
            status.text,
            price_label(facility, now)
        );
        if details {
            print_details(facility, now);
        }
    }

    Ok(())
}

fn print_details(facility: &Facility, now: NaiveDateTime) {
    if !facility.address.is_empty() {
        println!("    address: {}", facility.address);
    }
    if !facility.amenities.is_empty() {
        let badges: Vec<String> = facility
            .amenities
            .iter()
            .map(|a| {
                let badge = amenity_badge(a);
                format!("{} {}", badge.icon, badge.label)
            })
            .collect();
        println!("    amenities: {}", badges.join(", "));
    }
    println!(
        "    monthly lessons: {}",
        format_price(facility.monthly_lesson_price.as_ref())
    );
    if let Some(rows) = facility_timetable(facility, now.weekday()) {
        for row in rows {
            let sessions = if row.closed {
                "closed".to_string()
            } else if row.starts.is_empty() {
                "-".to_string()
            } else {
                row.starts.join(" ")
            };
            let marker = if row.is_today { "*" } else { " " };
            println!("    {marker}{} {sessions}", row.label);
        }
    }
    for platform in [
        NavigationPlatform::Naver,
        NavigationPlatform::Kakao,
        NavigationPlatform::Google,
    ] {
        println!("    {platform:?}: {}", navigation_url(facility, platform));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
