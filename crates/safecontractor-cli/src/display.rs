//! Terminal rendering for search results and contractor cards.
//!
//! Dates render US long-form ("March 5, 2024") and amounts as USD
//! ("$5,000.00"). Anything unparseable is shown as received.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use safecontractor_client::DetailState;
use safecontractor_core::{ContractorDetail, ProjectRecord, SearchResultItem};

const MAX_PROJECTS: usize = 20;
const DESCRIPTION_WIDTH: usize = 40;

// ── Public API ──

pub fn print_results(items: &[SearchResultItem]) {
    print!("{}", render_results(items));
}

pub fn print_detail_state(key: &str, state: &DetailState) {
    match state {
        DetailState::Loading => println!("Loading contractor data..."),
        DetailState::Resolved(detail) => print!("{}", render_card(detail)),
        DetailState::Failed(message) => println!("Error: {message}"),
        DetailState::NotFound => println!("Contractor not found: {key}"),
    }
}

// ── Results ──

pub fn render_results(items: &[SearchResultItem]) -> String {
    if items.is_empty() {
        return "No contractors found.\n".to_string();
    }

    let mut out = format!("Contractors ({}):\n", items.len());
    for (i, item) in items.iter().enumerate() {
        let _ = write!(out, "  {:>2}. {:<40}", i + 1, item.name);
        if let Some(license) = &item.license_id {
            let _ = write!(out, "  license: {license}");
        }
        if let Some(score) = item.score {
            let _ = write!(out, "  match: {score}%");
        }
        out.push('\n');
    }
    out
}

// ── Contractor card ──

pub fn render_card(detail: &ContractorDetail) -> String {
    let mut out = format!("=== {} ===\n", detail.name);
    if let Some(address) = &detail.address_details {
        let line = address.one_line();
        if !line.is_empty() {
            let _ = writeln!(out, "{line}");
        }
    }
    out.push('\n');

    let open = detail.previous_works.iter().filter(|p| p.is_open()).count();
    out.push_str("Summary\n");
    let _ = writeln!(out, "  {:<26} {}", "Total projects", detail.total_projects());
    let _ = writeln!(out, "  {:<26} {}", "Open projects", open);
    if let Some(latest) = detail.latest_project() {
        let value = latest.amount.map(format_money).unwrap_or_else(na);
        let _ = writeln!(out, "  {:<26} {}", "Latest project value", value);
        let _ = writeln!(out, "  {:<26} {}", "Current status", status_label(latest));
    }
    out.push('\n');

    render_projects(&mut out, &detail.previous_works);

    if let Some(analysis) = detail.analysis_text.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str("AI Analysis\n");
        let _ = writeln!(out, "  {}", analysis.trim());
        out.push('\n');
    }
    out
}

fn render_projects(out: &mut String, projects: &[ProjectRecord]) {
    if projects.is_empty() {
        out.push_str("Past Projects\n  (none on record)\n\n");
        return;
    }

    let _ = writeln!(out, "Past Projects ({}):", projects.len());
    let _ = writeln!(
        out,
        "    {:<20} {:<width$} {:>14}  {}",
        "Date",
        "Description",
        "Amount",
        "Status",
        width = DESCRIPTION_WIDTH
    );
    for project in projects.iter().take(MAX_PROJECTS) {
        let date = project.date_started.as_deref().map(format_date).unwrap_or_else(na);
        let description = project
            .description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| truncate(s.trim(), DESCRIPTION_WIDTH))
            .unwrap_or_else(na);
        let amount = project.amount.map(format_money).unwrap_or_else(na);
        let marker = if project.is_open() { "*" } else { " " };

        let _ = writeln!(
            out,
            "  {marker} {:<20} {:<width$} {:>14}  {}",
            date,
            description,
            amount,
            status_label(project),
            width = DESCRIPTION_WIDTH
        );
        if let Some(comments) = project.comments.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(out, "      {}", comments.trim());
        }
    }
    if projects.len() > MAX_PROJECTS {
        let _ = writeln!(out, "    ... and {} more", projects.len() - MAX_PROJECTS);
    }
    out.push('\n');
}

// ── Formatting ──

/// "2024-03-05" or "2024-03-05T09:30:00" → "March 5, 2024".
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"));
    match parsed {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// 5000.0 → "$5,000.00".
pub fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn status_label(project: &ProjectRecord) -> String {
    let status = project.status.trim();
    if status.is_empty() {
        na()
    } else {
        status.to_uppercase()
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

fn na() -> String {
    "N/A".to_string()
}
