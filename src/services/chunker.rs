//! Splits long document text into pieces small enough for a single model request.
//!
//! Text is cut along paragraph boundaries first, then sentence boundaries, and only as a
//! last resort at a hard character offset. All lengths are counted in `char`s.

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = ". ";

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chunk_size: usize,
}

impl Chunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if char_len(text) <= self.max_chunk_size {
            return vec![text.to_string()];
        }

        let mut buffer = ChunkBuffer::new(self.max_chunk_size);

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            if buffer.try_append(paragraph, PARAGRAPH_SEPARATOR) {
                continue;
            }

            for sentence in paragraph.split(SENTENCE_SEPARATOR) {
                if !buffer.try_append(sentence, SENTENCE_SEPARATOR) {
                    buffer.force_split(sentence);
                }
            }
        }

        buffer.finish()
    }
}

/// Greedy accumulator: units are joined into `current` until the next one would not fit.
struct ChunkBuffer {
    max: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl ChunkBuffer {
    fn new(max: usize) -> Self {
        Self {
            max,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// Returns false when `unit` alone exceeds the limit. The buffer is empty in that case.
    fn try_append(&mut self, unit: &str, separator: &str) -> bool {
        let unit_len = char_len(unit);

        if !self.current.is_empty() {
            if self.current_len + separator.len() + unit_len <= self.max {
                self.current.push_str(separator);
                self.current.push_str(unit);
                self.current_len += separator.len() + unit_len;
                return true;
            }
            self.flush();
        }

        if unit_len > self.max {
            return false;
        }

        self.current.push_str(unit);
        self.current_len = unit_len;
        true
    }

    /// Cuts an oversized unit into `max`-sized pieces; the tail stays buffered.
    fn force_split(&mut self, unit: &str) {
        let mut rest = unit;
        while char_len(rest) > self.max {
            let cut = byte_offset_of_char(rest, self.max);
            self.chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        self.current = rest.to_string();
        self.current_len = char_len(rest);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn byte_offset_of_char(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Truncates `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..byte_offset_of_char(text, max_chars)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bounded(chunks: &[String], max: usize) {
        for chunk in chunks {
            assert!(
                char_len(chunk) <= max,
                "chunk of {} chars exceeds {}",
                char_len(chunk),
                max
            );
        }
    }

    #[test]
    fn empty_text_yields_single_empty_chunk() {
        assert_eq!(Chunker::new(100).split(""), vec![String::new()]);
    }

    #[test]
    fn short_text_is_returned_whole() {
        let text = "One paragraph.\n\nAnother one.";
        assert_eq!(Chunker::new(100).split(text), vec![text.to_string()]);
    }

    #[test]
    fn paragraphs_are_grouped_greedily() {
        let paragraph = "p".repeat(30);
        let text = vec![paragraph.as_str(); 4].join("\n\n");

        let chunks = Chunker::new(70).split(&text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{0}\n\n{0}", paragraph));
        assert_eq!(chunks.join("\n\n"), text);
        assert_bounded(&chunks, 70);
    }

    #[test]
    fn oversized_paragraph_falls_back_to_sentences() {
        let sentence = "s".repeat(20);
        let long_paragraph = vec![sentence.as_str(); 6].join(". ");
        let text = format!("intro\n\n{}", long_paragraph);

        let chunks = Chunker::new(50).split(&text);

        assert_bounded(&chunks, 50);
        assert_eq!(chunks[0], "intro");
        assert_eq!(chunks[1], format!("{0}. {0}", sentence));
        let rejoined = chunks[1..].join(". ");
        assert_eq!(rejoined, long_paragraph);
    }

    #[test]
    fn oversized_sentence_is_force_split() {
        let text = "a".repeat(50_000);

        let chunks = Chunker::new(8_000).split(&text);

        assert_eq!(chunks.len(), 7);
        assert_eq!(chunks.concat(), text);
        assert_eq!(char_len(&chunks[6]), 2_000);
        assert_bounded(&chunks, 8_000);
    }

    #[test]
    fn force_split_respects_char_boundaries() {
        let text = "é".repeat(25);

        let chunks = Chunker::new(10).split(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
        assert_bounded(&chunks, 10);
    }

    #[test]
    fn truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
