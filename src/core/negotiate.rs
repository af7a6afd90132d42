//! Content negotiation for the mount endpoint
//!
//! The mount path serves two audiences: GraphQL clients (JSON) and browsers
//! (the interactive explorer). The dispatch decision reads the `Accept`
//! header as a list of weighted media ranges and asks which of `text/html`
//! and `application/json` the client prefers.
//!
//! Ties on quality resolve by range specificity, then by candidate order
//! with `text/html` first. A missing `Accept` header counts as `*/*`, so a
//! bare GET prefers the explorer; GraphQL clients issuing GET queries send
//! `Accept: application/json`.

use axum::http::{HeaderMap, header};

/// Candidates offered by the mount endpoint, in preference order
const CANDIDATES: [(&str, &str); 2] = [("text", "html"), ("application", "json")];

/// One media range from an `Accept` header, e.g. `text/*;q=0.8`
#[derive(Debug)]
struct MediaRange {
    kind: String,
    subtype: String,
    quality: f32,
    position: usize,
}

impl MediaRange {
    /// Specificity of the match against a concrete media type:
    /// exact > `type/*` > `*/*`, `None` when the range does not apply
    fn match_specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        match (self.kind.as_str(), self.subtype.as_str()) {
            (k, s) if k == kind && s == subtype => Some(2),
            (k, "*") if k == kind => Some(1),
            ("*", "*") => Some(0),
            _ => None,
        }
    }
}

fn parse_media_range(raw: &str, position: usize) -> Option<MediaRange> {
    let mut parts = raw.split(';');
    let range = parts.next()?.trim();
    let (kind, subtype) = range.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() {
        return None;
    }

    let mut quality = 1.0f32;
    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            if name.trim().eq_ignore_ascii_case("q") {
                quality = value.trim().parse().unwrap_or(1.0);
                quality = quality.clamp(0.0, 1.0);
            }
        }
    }

    Some(MediaRange {
        kind: kind.trim().to_ascii_lowercase(),
        subtype: subtype.trim().to_ascii_lowercase(),
        quality,
        position,
    })
}

fn parse_accept(value: &str) -> Vec<MediaRange> {
    value
        .split(',')
        .enumerate()
        .filter_map(|(position, raw)| parse_media_range(raw, position))
        .collect()
}

/// Index of the preferred candidate, or `None` when nothing is acceptable
fn preferred_candidate(ranges: &[MediaRange]) -> Option<usize> {
    let mut best: Option<(f32, u8, usize, usize)> = None;

    for (index, (kind, subtype)) in CANDIDATES.iter().enumerate() {
        // best applicable range for this candidate
        let mut candidate_match: Option<(f32, u8, usize)> = None;
        for range in ranges {
            if let Some(specificity) = range.match_specificity(kind, subtype) {
                let entry = (range.quality, specificity, range.position);
                let better = match candidate_match {
                    None => true,
                    Some((q, s, _)) => specificity > s || (specificity == s && range.quality > q),
                };
                if better {
                    candidate_match = Some(entry);
                }
            }
        }

        if let Some((quality, specificity, position)) = candidate_match {
            if quality <= 0.0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((q, s, p, _)) => {
                    quality > q
                        || (quality == q && specificity > s)
                        || (quality == q && specificity == s && position < p)
                }
            };
            if better {
                best = Some((quality, specificity, position, index));
            }
        }
    }

    best.map(|(_, _, _, index)| index)
}

/// True when the client prefers `text/html` over `application/json`
pub fn prefers_html(headers: &HeaderMap) -> bool {
    let accept = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");

    let ranges = if accept.trim().is_empty() {
        parse_accept("*/*")
    } else {
        parse_accept(&accept)
    };

    preferred_candidate(&ranges) == Some(0)
}
