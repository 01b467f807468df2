//! Splits long replies into messages that fit the platform limit

/// Telegram rejects messages longer than this many characters.
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Groups whole lines into chunks of at most `max_length` characters.
///
/// Joining the chunks with `'\n'` gives back `text` exactly. A line that is
/// longer than `max_length` on its own is not split and becomes an oversized
/// chunk. Empty text yields no chunks.
pub fn paginate(text: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if text.is_empty() {
        return chunks;
    }

    let mut current: Option<(String, usize)> = None;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        current = match current.take() {
            None => Some((line.to_string(), line_len)),
            Some((mut chunk, len)) if len + 1 + line_len <= max_length => {
                chunk.push('\n');
                chunk.push_str(line);
                Some((chunk, len + 1 + line_len))
            }
            Some((chunk, _)) => {
                chunks.push(chunk);
                Some((line.to_string(), line_len))
            }
        };
    }

    if let Some((chunk, _)) = current {
        chunks.push(chunk);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(paginate("one\ntwo", 100), vec!["one\ntwo"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(paginate("", 10).is_empty());
    }

    #[test]
    fn test_splits_on_line_boundaries() {
        let chunks = paginate("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_round_trip_and_bounds() {
        let lines: Vec<String> = (0..300)
            .map(|i| format!("*Компания {}* ИНН `{:010}`", i, i * 7919))
            .collect();
        let text = format!("{}\n\nитог\n", lines.join("\n"));

        for max in [40, 100, 257, 4096] {
            let chunks = paginate(&text, max);
            assert_eq!(chunks.join("\n"), text, "round trip failed for max {}", max);
            for chunk in &chunks {
                assert!(char_len(chunk) <= max, "chunk over {}: {}", max, char_len(chunk));
            }
        }
    }

    #[test]
    fn test_no_line_is_split() {
        let text = "alpha\nbeta\ngamma\ndelta\nepsilon";
        let chunks = paginate(text, 11);
        let source_lines: Vec<&str> = text.split('\n').collect();
        let chunk_lines: Vec<&str> = chunks.iter().flat_map(|c| c.split('\n')).collect();
        assert_eq!(chunk_lines, source_lines);
    }

    #[test]
    fn test_oversized_line_kept_whole() {
        let long = "x".repeat(50);
        let text = format!("short\n{}\ntail", long);
        let chunks = paginate(&text, 10);
        assert_eq!(chunks, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn test_trailing_and_blank_lines_survive() {
        let text = "a\n\n\nb\n";
        for max in [1, 2, 3, 100] {
            assert_eq!(paginate(text, max).join("\n"), text);
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let text = "ёёёё\nжжжж";
        assert_eq!(paginate(text, 9), vec![text.to_string()]);
    }
}
