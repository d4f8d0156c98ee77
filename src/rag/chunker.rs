/// Sentence-aware text chunker for vector storage.
///
/// Splits text into character-window chunks that prefer to break at a
/// sentence boundary near the window end, overlapping consecutive chunks
/// by a configurable amount.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

/// How far around the window end to look for a sentence boundary.
const BOUNDARY_SEARCH_RADIUS: usize = 100;

const SENTENCE_ENDINGS: [[char; 2]; 6] = [
    ['.', ' '],
    ['.', '\n'],
    ['!', ' '],
    ['!', '\n'],
    ['?', ' '],
    ['?', '\n'],
];

impl TextChunker {
    /// Create a chunker. `chunk_overlap` is clamped below `chunk_size` so
    /// every iteration makes forward progress.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split text into overlapping chunks.
    ///
    /// Empty or whitespace-only input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.trim().chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = (start + self.chunk_size).min(chars.len());

            // Prefer a sentence boundary near the window end, but only for
            // interior chunks; the final chunk runs to the end of the text.
            if end < chars.len() {
                let search_start = start.max(end.saturating_sub(BOUNDARY_SEARCH_RADIUS));
                let search_end = (end + BOUNDARY_SEARCH_RADIUS).min(chars.len());

                if let Some(boundary) = last_sentence_ending(&chars[search_start..search_end]) {
                    end = search_start + boundary + 1;
                }
            }

            let chunk: String = chars[start..end].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }

            if end >= chars.len() {
                break;
            }

            let next = end.saturating_sub(self.chunk_overlap);
            // Overlap must never move the window backwards
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Split text by paragraphs, packing consecutive paragraphs into chunks
    /// up to the size limit. Oversized paragraphs fall back to [`Self::chunk`].
    pub fn chunk_by_paragraphs(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            let paragraph_len = paragraph.chars().count();
            let current_len = current.chars().count();

            if current_len + paragraph_len + 2 > self.chunk_size {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }

                if paragraph_len > self.chunk_size {
                    chunks.extend(self.chunk(paragraph));
                } else {
                    current = paragraph.to_string();
                }
            } else if current.is_empty() {
                current = paragraph.to_string();
            } else {
                current.push_str("\n\n");
                current.push_str(paragraph);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

/// Index (relative to the slice) of the last sentence-ending punctuation
/// that is followed by whitespace.
fn last_sentence_ending(window: &[char]) -> Option<usize> {
    (0..window.len().saturating_sub(1))
        .rev()
        .find(|&i| SENTENCE_ENDINGS.contains(&[window[i], window[i + 1]]))
}
