/// One flattened output row: `book,chapter,verse,"text"`.
///
/// The numeric fields are the integers parsed from the source attributes,
/// carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    pub book: u32,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseRecord {
    /// Build a record from raw verse text.
    ///
    /// The text is normalized for the flat format: surrounding whitespace
    /// is trimmed and embedded double-quote characters are removed (not
    /// escaped). The normalization is lossy on purpose — the output is
    /// quote-wrapped plain text, not strict CSV quoting.
    pub fn new(book: u32, chapter: u32, verse: u32, text: &str) -> Self {
        Self {
            book,
            chapter,
            verse,
            text: text.trim().replace('"', ""),
        }
    }

    /// Format as one output line, without the trailing newline.
    pub fn csv_line(&self) -> String {
        format!("{},{},{},\"{}\"", self.book, self.chapter, self.verse, self.text)
    }
}
