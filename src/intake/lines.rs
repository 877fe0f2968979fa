//! Line reconstruction from positioned text fragments.
//!
//! 1. Bucket each fragment's `y` by rounding `y / tolerance`.
//! 2. Within a bucket, sort fragments by `x` ascending and join with one space.
//! 3. Emit buckets by descending `y` (top of page first).
//!
//! Purely structural: nothing here interprets the text.

use std::collections::BTreeMap;

use super::types::{PageFragments, ReconstructedLine, TextFragment};

/// Default bucket height: plain rounding to the nearest integer.
pub const DEFAULT_Y_TOLERANCE: f32 = 1.0;

/// Map a `y` coordinate to its line bucket.
#[allow(clippy::cast_possible_truncation)]
pub fn y_bucket(y: f32, tolerance: f32) -> i64 {
    (y / tolerance).round() as i64
}

/// Group one page's fragments into visually ordered lines.
///
/// Whitespace-only fragments are dropped so they cannot produce doubled
/// separators in the joined text.
pub fn reconstruct_lines(fragments: &[TextFragment], tolerance: f32) -> Vec<ReconstructedLine> {
    let mut buckets: BTreeMap<i64, Vec<TextFragment>> = BTreeMap::new();

    for fragment in fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }
        buckets
            .entry(y_bucket(fragment.y, tolerance))
            .or_default()
            .push(fragment.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(bucket, mut fragments)| {
            // Stable sort keeps source order for fragments at the same x.
            fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
            let text = fragments
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            ReconstructedLine {
                bucket,
                fragments,
                text,
            }
        })
        .collect()
}

/// Reconstruct every page independently and concatenate in page order.
pub fn reconstruct_document(pages: &[PageFragments], tolerance: f32) -> Vec<ReconstructedLine> {
    pages
        .iter()
        .flat_map(|page| reconstruct_lines(page, tolerance))
        .collect()
}

/// Full document text: lines joined and whitespace collapsed to single spaces.
pub fn document_text(lines: &[ReconstructedLine]) -> String {
    lines
        .iter()
        .flat_map(|line| line.text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y)
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(reconstruct_lines(&[], DEFAULT_Y_TOLERANCE).is_empty());
    }

    #[test]
    fn joins_same_row_fragments_in_x_order() {
        let fragments = vec![
            frag("5", 90.0, 100.0),
            frag("ABC123", 0.0, 100.0),
            frag("Widget", 40.0, 100.0),
        ];
        let lines = reconstruct_lines(&fragments, DEFAULT_Y_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "ABC123 Widget 5");
    }

    #[test]
    fn rounds_nearby_baselines_into_one_line() {
        let fragments = vec![frag("A", 0.0, 99.8), frag("B", 10.0, 100.3)];
        let lines = reconstruct_lines(&fragments, DEFAULT_Y_TOLERANCE);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "A B");
    }

    #[test]
    fn orders_lines_top_to_bottom() {
        let fragments = vec![
            frag("bottom", 0.0, 10.0),
            frag("top", 0.0, 700.0),
            frag("middle", 0.0, 300.0),
        ];
        let lines = reconstruct_lines(&fragments, DEFAULT_Y_TOLERANCE);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["top", "middle", "bottom"]);
        assert!(lines.windows(2).all(|w| w[0].bucket > w[1].bucket));
    }

    #[test]
    fn wider_tolerance_merges_more_rows() {
        let fragments = vec![frag("A", 0.0, 100.0), frag("B", 10.0, 101.5)];
        assert_eq!(reconstruct_lines(&fragments, 1.0).len(), 2);
        assert_eq!(reconstruct_lines(&fragments, 4.0).len(), 1);
    }

    #[test]
    fn drops_blank_fragments() {
        let fragments = vec![
            frag("A", 0.0, 50.0),
            frag("  ", 5.0, 50.0),
            frag("B", 10.0, 50.0),
        ];
        let lines = reconstruct_lines(&fragments, DEFAULT_Y_TOLERANCE);
        assert_eq!(lines[0].text, "A B");
    }

    #[test]
    fn pages_are_concatenated_in_order() {
        let pages = vec![
            vec![frag("p1-low", 0.0, 10.0), frag("p1-high", 0.0, 500.0)],
            vec![frag("p2-high", 0.0, 500.0)],
        ];
        let lines = reconstruct_document(&pages, DEFAULT_Y_TOLERANCE);
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["p1-high", "p1-low", "p2-high"]);
    }

    #[test]
    fn document_text_collapses_whitespace() {
        let fragments = vec![frag("REPORTE  DE", 0.0, 20.0), frag("EXISTENCIAS", 0.0, 10.0)];
        let lines = reconstruct_lines(&fragments, DEFAULT_Y_TOLERANCE);
        assert_eq!(document_text(&lines), "REPORTE DE EXISTENCIAS");
    }
}
