//! Text segmentation into overlapping chunks.
//!
//! Splitting is windowed over characters: each window covers at most
//! `max_len` characters and the window end snaps back to the largest
//! semantic boundary available inside it (paragraph break, then newline,
//! then space, then a hard character cut). Each chunk after the first
//! starts exactly `overlap` characters before the previous chunk's end, so
//! a retrieval query landing near a boundary still sees both sides.

use tracing::debug;

use crate::chunk::{Chunk, Page};
use crate::loader::PageText;

/// Splits `text` into chunks of at most `max_len` characters with exactly
/// `overlap` shared characters between adjacent chunks (the final chunk may
/// be shorter than `max_len`).
///
/// Empty input produces zero chunks. Every input character appears in at
/// least one chunk. `overlap` is clamped below `max_len`; callers validate
/// the configured values via `StoreConfig::validate`.
pub fn split_text(text: &str, max_len: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if n == 0 || max_len == 0 {
        return Vec::new();
    }
    let overlap = overlap.min(max_len - 1);

    let mut out = Vec::new();
    let mut start = 0usize;
    loop {
        let hard_end = (start + max_len).min(n);
        let end = if hard_end < n {
            snap_boundary(&chars, start, hard_end, overlap)
        } else {
            n
        };
        out.push(chars[start..end].iter().collect());
        if end >= n {
            break;
        }
        // Exact overlap with the previous chunk; the max() guarantees
        // forward progress even for degenerate boundary snaps.
        start = end.saturating_sub(overlap).max(start + 1);
    }
    out
}

/// Finds the best exclusive end position in `(floor, hard_end]`, preferring
/// a paragraph break, then a line break, then a word break. The floor at
/// half the window keeps chunks from collapsing when the only boundary sits
/// near the window start; it is additionally held past `start + overlap` so
/// a chunk never ends inside its own overlap region, which would leave the
/// next chunk sharing fewer than `overlap` characters.
fn snap_boundary(chars: &[char], start: usize, hard_end: usize, overlap: usize) -> usize {
    let floor = (start + (hard_end - start) / 2).max(start + overlap + 1);

    for e in (floor..hard_end).rev() {
        if chars[e] == '\n' && e > start && chars[e - 1] == '\n' {
            return e + 1;
        }
    }
    for e in (floor..hard_end).rev() {
        if chars[e] == '\n' {
            return e + 1;
        }
    }
    for e in (floor..hard_end).rev() {
        if chars[e] == ' ' {
            return e + 1;
        }
    }
    hard_end
}

/// Segments loaded pages into chunks tagged with page number and source id.
///
/// Whitespace-only chunks are dropped (chunk text is non-empty by
/// invariant). Chunk order follows document order.
pub fn segment_pages(
    pages: &[PageText],
    max_len: usize,
    overlap: usize,
    source: &str,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for page in pages {
        for text in split_text(&page.text, max_len, overlap) {
            if text.trim().is_empty() {
                continue;
            }
            chunks.push(Chunk {
                text,
                page: Page::Number(page.page),
                source: source.to_string(),
            });
        }
    }
    debug!(
        pages = pages.len(),
        chunks = chunks.len(),
        "segmentation complete"
    );
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_chars(prev: &str, next: &str) -> usize {
        let prev: Vec<char> = prev.chars().collect();
        let next: Vec<char> = next.chars().collect();
        let max = prev.len().min(next.len());
        (0..=max)
            .rev()
            .find(|&k| prev[prev.len() - k..] == next[..k])
            .unwrap_or(0)
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_text("", 100, 20).is_empty());
    }

    #[test]
    fn short_input_is_one_chunk() {
        let chunks = split_text("hello world", 100, 20);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    // Distinct words: repeated text would make the measured shared run
    // longer than the real overlap.
    fn distinct_words(n: usize) -> String {
        (0..n).map(|i| format!("w{i:03} ")).collect()
    }

    #[test]
    fn chunks_respect_max_length() {
        let text = distinct_words(400);
        for c in split_text(&text, 100, 20) {
            assert!(c.chars().count() <= 100);
        }
    }

    #[test]
    fn adjacent_chunks_share_exactly_the_overlap() {
        let text = distinct_words(400);
        let overlap = 20;
        let chunks = split_text(&text, 100, overlap);
        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            assert_eq!(shared_chars(&pair[0], &pair[1]), overlap);
        }
    }

    #[test]
    fn high_overlap_keeps_the_exact_overlap_across_boundaries() {
        // A paragraph break placed inside the overlap region must not win
        // the snap; taking it would leave the next chunk sharing fewer than
        // `overlap` characters and stall the window.
        let words = distinct_words(120);
        let text = format!("{}\n\n{}", &words[..57], &words[57..]);
        let overlap = 60;
        let chunks = split_text(&text, 100, overlap);

        assert!(chunks.len() > 2);
        for c in &chunks {
            assert!(c.chars().count() <= 100);
        }
        for pair in chunks.windows(2) {
            assert_eq!(shared_chars(&pair[0], &pair[1]), overlap);
        }

        let mut rebuilt: String = chunks[0].clone();
        for c in &chunks[1..] {
            rebuilt.extend(c.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn concatenating_new_content_reconstructs_the_input() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(40);
        let overlap = 30;
        let chunks = split_text(&text, 120, overlap);

        let mut rebuilt: String = chunks[0].clone();
        for c in &chunks[1..] {
            rebuilt.extend(c.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn paragraph_breaks_are_preferred() {
        let para = "a".repeat(60);
        let text = format!("{para}\n\n{para}\n\n{para}");
        let chunks = split_text(&text, 100, 10);
        // First chunk ends right after the paragraph break rather than
        // cutting into the second paragraph.
        assert!(chunks[0].ends_with("\n\n"));
    }

    #[test]
    fn pages_tag_chunks_with_their_number() {
        let pages = vec![
            PageText {
                page: 1,
                text: "first page text".into(),
            },
            PageText {
                page: 2,
                text: "second page text".into(),
            },
        ];
        let chunks = segment_pages(&pages, 100, 10, "doc.txt");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page, Page::Number(1));
        assert_eq!(chunks[1].page, Page::Number(2));
        assert!(chunks.iter().all(|c| c.source == "doc.txt"));
    }

    #[test]
    fn whitespace_only_pages_produce_no_chunks() {
        let pages = vec![PageText {
            page: 1,
            text: "   \n\n  ".into(),
        }];
        assert!(segment_pages(&pages, 100, 10, "doc.txt").is_empty());
    }
}
