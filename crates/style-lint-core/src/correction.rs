//! Multi-range rewrite engine shared by correctable rules.
//!
//! A rule hands over every range it wants to rewrite, computed against one
//! snapshot of the buffer. The engine drops ranges it cannot fix safely in
//! this pass and produces the whole new text at once, so offsets of later
//! ranges never shift while earlier ones are being rewritten.
//!
//! Nested ranges are resolved outermost-first: only the outer range is
//! rewritten, and a second pass over the new text picks up the inner one.

use crate::syntax::ByteRange;

use tracing::debug;

/// Drops every range that lies entirely within a different range.
///
/// Identical duplicates are kept, since neither strictly contains the other.
#[must_use]
pub fn remove_nested(ranges: &[ByteRange]) -> Vec<ByteRange> {
    ranges
        .iter()
        .filter(|current| {
            !ranges
                .iter()
                .any(|parent| parent != *current && parent.contains(current))
        })
        .copied()
        .collect()
}

/// Turns candidate ranges into an ascending set of disjoint ranges.
///
/// Nested ranges are removed first. Of two partially overlapping ranges the
/// earlier one wins; identical duplicates collapse into one.
#[must_use]
pub fn resolve(ranges: &[ByteRange]) -> Vec<ByteRange> {
    let mut outer = remove_nested(ranges);
    outer.sort();
    outer.dedup();

    let mut resolved: Vec<ByteRange> = Vec::with_capacity(outer.len());
    for range in outer {
        if let Some(last) = resolved.last() {
            if last.intersects(&range) {
                debug!(
                    "Deferring overlapping range {}..{} to a later pass",
                    range.location,
                    range.end()
                );
                continue;
            }
        }
        resolved.push(range);
    }
    resolved
}

/// Rebuilds `text` with every range replaced by `fix(original_segment)`.
///
/// `ranges` must be ascending, disjoint and on character boundaries, as
/// returned by [`resolve`]. Text between ranges is copied unchanged. Ranges
/// that fall outside `text` are skipped.
#[must_use]
pub fn rewrite<F>(text: &str, ranges: &[ByteRange], mut fix: F) -> String
where
    F: FnMut(&str) -> String,
{
    let start = ByteRange::new(0, 0);
    let end = ByteRange::new(text.len(), 0);
    let bounds: Vec<ByteRange> = std::iter::once(start)
        .chain(ranges.iter().copied())
        .chain(std::iter::once(end))
        .collect();

    let mut sections = Vec::with_capacity(bounds.len() * 2);
    let mut cursor = 0;
    for pair in bounds.windows(2) {
        let next = pair[1];
        let Some(untouched) = text.get(cursor..next.location) else {
            debug!("Skipping range {}..{} outside buffer", next.location, next.end());
            continue;
        };
        sections.push(untouched.to_string());
        cursor = next.location;

        if next.is_empty() {
            continue;
        }
        match text.get(next.location..next.end()) {
            Some(segment) => {
                sections.push(fix(segment));
                cursor = next.end();
            }
            None => debug!("Skipping range {}..{} outside buffer", next.location, next.end()),
        }
    }
    sections.concat()
}
