//! Splits long documents into overlapping chunks for the knowledge store.

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Separators tried in order when looking for a place to end a chunk.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Splits `text` into chunks of at most `chunk_size` characters, consecutive chunks sharing
/// about `overlap` characters.
///
/// Chunks end at the last paragraph, line, sentence or word break in the second half of the
/// window when there is one, otherwise at the hard limit. Lengths are counted in chars, so
/// multi-byte text is never cut inside a character. Blank chunks are dropped.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size / 2);
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            break_point(&chars[start..hard_end]).map_or(hard_end, |i| start + i)
        };

        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }

        let mut next = end.saturating_sub(overlap).max(start + 1);
        // start the overlap on a word boundary when one is close
        if let Some(ws) = chars[next..end].iter().position(|c| c.is_whitespace()) {
            next += ws + 1;
        }
        start = next.min(end);
    }
    chunks
}

/// Offset just after the best separator in the second half of `window`.
fn break_point(window: &[char]) -> Option<usize> {
    let min = window.len() / 2;
    SEPARATORS.iter().find_map(|sep| {
        let sep: Vec<char> = sep.chars().collect();
        (min..=window.len().saturating_sub(sep.len()))
            .rev()
            .find(|&i| window[i..i + sep.len()] == sep[..])
            .map(|i| i + sep.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Text shorter than a chunk comes back as one trimmed chunk.
    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("  fever and cough \n", 1000, 200), vec!["fever and cough"]);
        assert!(split_text("   ", 1000, 200).is_empty());
    }

    /// **Scenario**: Every chunk respects the size limit and neighbours overlap.
    #[test]
    fn long_text_chunks_are_bounded_and_overlap() {
        let text = (0..300)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 100, 20);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
        for pair in chunks.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            assert!(pair[1].contains(last_word), "{:?}", pair);
        }
        assert!(chunks.last().unwrap().ends_with("word299"));
    }

    /// **Scenario**: Chunks prefer paragraph breaks.
    #[test]
    fn prefers_paragraph_breaks() {
        let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
        let chunks = split_text(&text, 100, 0);
        assert_eq!(chunks[0], "a".repeat(60));
        assert_eq!(chunks[1], "b".repeat(60));
    }

    /// **Scenario**: Multi-byte characters are never split.
    #[test]
    fn multibyte_text_is_char_safe() {
        let text = "é".repeat(250);
        let chunks = split_text(&text, 100, 10);
        assert!(chunks.iter().all(|c| c.chars().all(|ch| ch == 'é')));
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    }
}
