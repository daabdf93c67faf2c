use crate::record::VerseRecord;

/// A parsed Zefania XML document: an ordered sequence of books.
///
/// The tree mirrors the source nesting (BIBLEBOOK → CHAPTER → VERS) and
/// keeps document order throughout; nothing is re-sorted by number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibleDocument {
    pub books: Vec<Book>,
}

/// A book within a document (`BIBLEBOOK`, attribute `bnumber`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub number: u32,
    pub chapters: Vec<Chapter>,
}

/// A chapter within a book (`CHAPTER`, attribute `cnumber`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: u32,
    pub verses: Vec<Verse>,
}

/// A verse within a chapter (`VERS`, attribute `vnumber`).
///
/// `text` is the raw leading text of the element — the text before the
/// first child element, if any. Normalization happens when the verse is
/// flattened into a [`VerseRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

impl BibleDocument {
    /// Total number of verses across all books and chapters.
    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.verses.len())
            .sum()
    }

    /// Flatten the document into output records, in document order:
    /// book, then chapter, then verse, each as encountered in the source.
    pub fn records(&self) -> impl Iterator<Item = VerseRecord> + '_ {
        self.books.iter().flat_map(|book| {
            book.chapters.iter().flat_map(move |chapter| {
                chapter.verses.iter().map(move |verse| {
                    VerseRecord::new(book.number, chapter.number, verse.number, &verse.text)
                })
            })
        })
    }
}
