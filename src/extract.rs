//! Shared HTML extraction helpers used by every source strategy: element and
//! meta lookups, paragraph harvesting, the publish-date strategy chain, and
//! content-region image collection.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Image URLs containing any of these substrings are dropped (tracking
/// pixels, grey placeholders, site chrome).
pub const IMAGE_DENYLIST: &[&str] = &[
    "placeholder",
    "/assets/",
    "/logo",
    "logo.",
    "promo",
    "thumbnail",
];

/* -------------------- ELEMENT HELPERS -------------------- */

/// Trimmed text of the first element matching `css`, or None when the
/// element is absent or empty.
pub fn text_of_first(document: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    let n = document.select(&sel).next()?;
    let text = n.text().collect::<Vec<_>>().join(" ").trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// An attribute of the first element matching `css`.
pub fn attr_of_first(document: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    let n = document.select(&sel).next()?;
    n.value().attr(attr).map(|s| s.to_string())
}

/// `content` attribute of the first matching meta tag, empty values skipped.
pub fn meta_content(document: &Html, css: &str) -> Option<String> {
    attr_of_first(document, css, "content").filter(|v| !v.trim().is_empty())
}

/// Non-empty trimmed paragraph texts matched by `css`, in document order.
pub fn paragraphs(document: &Html, css: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(css) else {
        return Vec::new();
    };
    document
        .select(&sel)
        .map(|node| node.text().collect::<Vec<_>>().join(" ").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// First candidate selector that yields any paragraphs wins.
pub fn first_non_empty_paragraphs(document: &Html, candidates: &[&str]) -> Vec<String> {
    for css in candidates {
        let parts = paragraphs(document, css);
        if !parts.is_empty() {
            return parts;
        }
    }
    Vec::new()
}

/// Body text of an article document: paragraphs newline-joined.
pub fn join_paragraphs(parts: &[String]) -> String {
    parts.join("\n")
}

/// Collapse runs of whitespace to single spaces.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/* -------------------- DATE HELPERS -------------------- */

/// Publication times are stored in the fixed target zone (UTC+8) with the
/// offset dropped afterwards.
pub fn target_zone() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn to_store_time(dt: DateTime<FixedOffset>) -> NaiveDateTime {
    dt.with_timezone(&target_zone()).naive_local()
}

/// Parse a machine-readable timestamp. Zone-aware forms are converted to
/// the target zone; naive forms are kept as-is.
pub fn parse_machine_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = clean(raw);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Some(to_store_time(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&raw) {
        return Some(to_store_time(dt));
    }
    if let Ok(dt) = DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(to_store_time(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// A millisecond epoch timestamp, converted to the target zone and stored
/// naive.
pub fn epoch_millis_date(ms: i64) -> Option<NaiveDateTime> {
    let dt = DateTime::from_timestamp_millis(ms)?;
    Some(dt.with_timezone(&target_zone()).naive_local())
}

static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2} [A-Za-z]{3,9} \d{4})(?: (\d{1,2}:\d{2}))?").unwrap());
static MONTH_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z]{3,9} \d{1,2}, \d{4})(?: (\d{1,2}:\d{2}))?").unwrap());
static ISO_DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());

fn strip_noise(s: &str) -> String {
    let mut t = s.trim();
    for prefix in [
        "Updated:",
        "Updated",
        "Published On:",
        "Published On",
        "Published on",
        "Published:",
        "Last updated:",
        "Last updated",
    ] {
        if let Some(rest) = t.strip_prefix(prefix) {
            t = rest.trim_start();
            break;
        }
    }
    t.trim().strip_suffix(", UK").unwrap_or(t.trim()).to_string()
}

fn at_time(date: NaiveDate, time: Option<&str>) -> Option<NaiveDateTime> {
    let time = time
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    Some(date.and_time(time))
}

/// Fuzzy parse of visible date text: known noise stripped, then a
/// machine-format attempt, then date-shaped substrings tried against common
/// textual layouts. Dates parsed this way carry no zone information and are
/// stored unshifted.
pub fn parse_fuzzy_date(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = strip_noise(&clean(raw));
    if cleaned.is_empty() {
        return None;
    }
    if let Some(dt) = parse_machine_date(&cleaned) {
        return Some(dt);
    }

    if let Some(caps) = DAY_FIRST.captures(&cleaned) {
        let date_str = caps.get(1).map(|m| m.as_str())?;
        for fmt in ["%d %b %Y", "%d %B %Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(date_str, fmt) {
                return at_time(d, caps.get(2).map(|m| m.as_str()));
            }
        }
    }
    if let Some(caps) = MONTH_FIRST.captures(&cleaned) {
        let date_str = caps.get(1).map(|m| m.as_str())?;
        for fmt in ["%b %d, %Y", "%B %d, %Y"] {
            if let Ok(d) = NaiveDate::parse_from_str(date_str, fmt) {
                return at_time(d, caps.get(2).map(|m| m.as_str()));
            }
        }
    }
    if let Some(caps) = ISO_DAY.captures(&cleaned) {
        if let Ok(d) = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d") {
            return at_time(d, None);
        }
    }
    None
}

const META_DATE_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[itemprop="datePublished"]"#,
    r#"meta[name="date"]"#,
    r#"meta[name="OriginalPublicationDate"]"#,
    r#"meta[property="og:updated_time"]"#,
];

/// Strategy (a): page metadata timestamp.
pub fn meta_date(document: &Html) -> Option<NaiveDateTime> {
    for css in META_DATE_SELECTORS {
        if let Some(raw) = meta_content(document, css) {
            if let Some(dt) = parse_machine_date(&raw) {
                return Some(dt);
            }
        }
    }
    None
}

/// Strategy (b): a `<time>` element with a machine-readable attribute.
pub fn time_tag_date(document: &Html) -> Option<NaiveDateTime> {
    let raw = attr_of_first(document, "time[datetime]", "datetime")?;
    parse_machine_date(&raw)
}

/// Strategy (c): fuzzy parse of the first visible date-like element.
pub fn visible_date(document: &Html, css: &str) -> Option<NaiveDateTime> {
    let raw = text_of_first(document, css)?;
    parse_fuzzy_date(&raw)
}

/// Default strategy chain: metadata, then `<time datetime>`, then fuzzy
/// text. First hit wins; strategies are never cross-validated.
pub fn published_at(document: &Html) -> Option<NaiveDateTime> {
    meta_date(document)
        .or_else(|| time_tag_date(document))
        .or_else(|| visible_date(document, r#"time, [class*="date"], [class*="timestamp"]"#))
}

/* -------------------- IMAGE HELPERS -------------------- */

pub fn is_denylisted(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_DENYLIST.iter().any(|s| lower.contains(s))
}

/// Candidate URLs of a `srcset` attribute (the URL token of each entry).
pub fn srcset_urls(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.trim().split_whitespace().next())
        .filter(|u| !u.is_empty())
}

/// Absolutize and admit one image candidate into the output set. `data:`
/// URIs, denylisted URLs, and unresolvable relatives are dropped.
pub fn push_image(candidate: &str, base: &Url, out: &mut BTreeSet<String>) {
    if candidate.is_empty() || candidate.starts_with("data:") || is_denylisted(candidate) {
        return;
    }
    let absolute = if candidate.starts_with("http://") || candidate.starts_with("https://") {
        candidate.to_string()
    } else if candidate.starts_with('/') {
        match base.join(candidate) {
            Ok(u) => u.to_string(),
            Err(_) => return,
        }
    } else {
        return;
    };
    out.insert(absolute);
}

fn region_selector(region: &str, suffix: &str) -> Option<Selector> {
    let css = if region.is_empty() {
        suffix.to_string()
    } else {
        format!("{region} {suffix}")
    };
    Selector::parse(&css).ok()
}

/// Collect image URLs inside a content region: `<img src>`, `<img srcset>`,
/// and `<picture><source srcset>`. Output is a deduplicated set; input
/// ordering is not preserved.
pub fn collect_images(document: &Html, region: &str, base: &Url) -> Vec<String> {
    let mut out = BTreeSet::new();

    if let Some(sel) = region_selector(region, "img") {
        for img in document.select(&sel) {
            if let Some(src) = img.value().attr("src") {
                push_image(src, base, &mut out);
            }
            if let Some(srcset) = img.value().attr("srcset") {
                for candidate in srcset_urls(srcset) {
                    push_image(candidate, base, &mut out);
                }
            }
        }
    }
    if let Some(sel) = region_selector(region, "picture source[srcset]") {
        for source in document.select(&sel) {
            if let Some(srcset) = source.value().attr("srcset") {
                for candidate in srcset_urls(srcset) {
                    push_image(candidate, base, &mut out);
                }
            }
        }
    }

    out.into_iter().collect()
}
