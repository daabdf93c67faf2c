// Event-based parsing of Zefania XML documents.
//
// The source nesting is BIBLEBOOK[@bnumber] → CHAPTER[@cnumber] →
// VERS[@vnumber]. Elements outside that nesting context (headers like
// INFORMATION, or a VERS not directly under a CHAPTER) are ignored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scriptorium_model::{BibleDocument, Book, Chapter, ConvertError, Verse};

/// Parse a full Zefania document into the model tree.
///
/// Verse text follows the leading-text rule: only text appearing before
/// the first child element of a VERS counts as the verse payload; text
/// inside or after child elements (notes, style markup) is dropped.
///
/// Any Book/Chapter/Verse still open at end of input is a parse error,
/// so truncated documents are rejected rather than silently shortened.
pub fn parse_document(xml: &str) -> Result<BibleDocument, ConvertError> {
    let mut reader = Reader::from_str(xml);

    let mut books: Vec<Book> = Vec::new();
    let mut book: Option<Book> = None;
    let mut chapter: Option<Chapter> = None;
    let mut verse: Option<Verse> = None;
    // Nesting depth of child elements inside the current verse, and
    // whether any child has been seen (which ends text accumulation).
    let mut verse_child_depth: usize = 0;
    let mut verse_saw_child = false;

    loop {
        match reader.read_event() {
            Err(e) => return Err(ConvertError::Parse(e.to_string())),

            Ok(Event::Start(e)) => {
                if verse.is_some() {
                    verse_child_depth += 1;
                    verse_saw_child = true;
                } else {
                    match e.name().as_ref() {
                        b"BIBLEBOOK" if book.is_none() => {
                            book = Some(Book {
                                number: numeric_attribute(&e, "bnumber")?,
                                chapters: Vec::new(),
                            });
                        }
                        b"CHAPTER" if book.is_some() && chapter.is_none() => {
                            chapter = Some(Chapter {
                                number: numeric_attribute(&e, "cnumber")?,
                                verses: Vec::new(),
                            });
                        }
                        b"VERS" if chapter.is_some() => {
                            verse = Some(Verse {
                                number: numeric_attribute(&e, "vnumber")?,
                                text: String::new(),
                            });
                            verse_saw_child = false;
                        }
                        _ => {}
                    }
                }
            }

            Ok(Event::Empty(e)) => {
                if verse.is_some() {
                    verse_saw_child = true;
                } else {
                    match e.name().as_ref() {
                        b"BIBLEBOOK" if book.is_none() => {
                            books.push(Book {
                                number: numeric_attribute(&e, "bnumber")?,
                                chapters: Vec::new(),
                            });
                        }
                        b"CHAPTER" if chapter.is_none() => {
                            if let Some(b) = book.as_mut() {
                                b.chapters.push(Chapter {
                                    number: numeric_attribute(&e, "cnumber")?,
                                    verses: Vec::new(),
                                });
                            }
                        }
                        b"VERS" => {
                            if let Some(c) = chapter.as_mut() {
                                c.verses.push(Verse {
                                    number: numeric_attribute(&e, "vnumber")?,
                                    text: String::new(),
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }

            Ok(Event::Text(t)) => {
                if let Some(v) = verse.as_mut() {
                    if !verse_saw_child {
                        let text = t
                            .unescape()
                            .map_err(|e| ConvertError::Parse(e.to_string()))?;
                        v.text.push_str(&text);
                    }
                }
            }

            Ok(Event::CData(t)) => {
                if let Some(v) = verse.as_mut() {
                    if !verse_saw_child {
                        v.text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
            }

            Ok(Event::End(e)) => {
                if verse_child_depth > 0 {
                    verse_child_depth -= 1;
                } else if e.name().as_ref() == b"VERS" {
                    if let Some(v) = verse.take() {
                        if let Some(c) = chapter.as_mut() {
                            c.verses.push(v);
                        }
                    }
                } else if e.name().as_ref() == b"CHAPTER" {
                    if let Some(c) = chapter.take() {
                        if let Some(b) = book.as_mut() {
                            b.chapters.push(c);
                        }
                    }
                } else if e.name().as_ref() == b"BIBLEBOOK" {
                    if let Some(b) = book.take() {
                        books.push(b);
                    }
                }
            }

            Ok(Event::Eof) => {
                if book.is_some() || chapter.is_some() || verse.is_some() {
                    return Err(ConvertError::Parse(
                        "unexpected end of document inside an open element".to_string(),
                    ));
                }
                return Ok(BibleDocument { books });
            }

            // Declarations, comments, processing instructions, doctypes
            Ok(_) => {}
        }
    }
}

/// Read a required integer attribute off an element.
fn numeric_attribute(e: &BytesStart, name: &str) -> Result<u32, ConvertError> {
    let element = String::from_utf8_lossy(e.name().as_ref()).to_string();

    let attr = e
        .try_get_attribute(name)
        .map_err(|err| ConvertError::Parse(err.to_string()))?
        .ok_or_else(|| ConvertError::MissingAttribute {
            element: element.clone(),
            attribute: name.to_string(),
        })?;

    let value = attr
        .unescape_value()
        .map_err(|err| ConvertError::Parse(err.to_string()))?;

    value.trim().parse().map_err(|_| ConvertError::BadAttribute {
        element,
        attribute: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_model::FailureKind;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<XMLBIBLE xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" biblename="KJV">
  <INFORMATION>
    <title>King James Version</title>
  </INFORMATION>
  <BIBLEBOOK bnumber="1" bname="Genesis">
    <CHAPTER cnumber="1">
      <VERS vnumber="1">In the beginning God created the heaven and the earth.</VERS>
      <VERS vnumber="2">And the earth was without form, and void.</VERS>
    </CHAPTER>
    <CHAPTER cnumber="2">
      <VERS vnumber="1">Thus the heavens and the earth were finished.</VERS>
    </CHAPTER>
  </BIBLEBOOK>
  <BIBLEBOOK bnumber="2" bname="Exodus">
    <CHAPTER cnumber="1">
      <VERS vnumber="1">Now these are the names.</VERS>
    </CHAPTER>
  </BIBLEBOOK>
</XMLBIBLE>
"#;

    #[test]
    fn test_parse_sample() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(doc.books.len(), 2);
        assert_eq!(doc.verse_count(), 4);
        assert_eq!(doc.books[0].number, 1);
        assert_eq!(doc.books[0].chapters.len(), 2);
        assert_eq!(
            doc.books[0].chapters[0].verses[0].text,
            "In the beginning God created the heaven and the earth."
        );
        assert_eq!(doc.books[1].chapters[0].verses[0].number, 1);
    }

    #[test]
    fn test_record_count_matches_verse_elements() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(doc.records().count(), doc.verse_count());
    }

    #[test]
    fn test_empty_and_self_closing_verses() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"><CHAPTER cnumber="1">
            <VERS vnumber="3"></VERS>
            <VERS vnumber="4"/>
        </CHAPTER></BIBLEBOOK></XMLBIBLE>"#;
        let doc = parse_document(xml).unwrap();
        let verses = &doc.books[0].chapters[0].verses;
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].number, 3);
        assert_eq!(verses[0].text, "");
        assert_eq!(verses[1].number, 4);
        assert_eq!(verses[1].text, "");
    }

    #[test]
    fn test_verse_text_stops_at_first_child_element() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"><CHAPTER cnumber="1">
            <VERS vnumber="1">In the beginning <NOTE>a note</NOTE> trailing text</VERS>
        </CHAPTER></BIBLEBOOK></XMLBIBLE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.books[0].chapters[0].verses[0].text, "In the beginning ");
    }

    #[test]
    fn test_entities_unescaped() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"><CHAPTER cnumber="1">
            <VERS vnumber="1">say &quot;hello&quot; &amp; welcome</VERS>
        </CHAPTER></BIBLEBOOK></XMLBIBLE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(
            doc.books[0].chapters[0].verses[0].text,
            "say \"hello\" & welcome"
        );
    }

    #[test]
    fn test_missing_attribute() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"><CHAPTER>
            <VERS vnumber="1">text</VERS>
        </CHAPTER></BIBLEBOOK></XMLBIBLE>"#;
        let err = parse_document(xml).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Attribute);
        assert!(err.to_string().contains("cnumber"));
    }

    #[test]
    fn test_non_numeric_attribute() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="one"></BIBLEBOOK></XMLBIBLE>"#;
        let err = parse_document(xml).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Attribute);
        assert!(err.to_string().contains("one"));
    }

    #[test]
    fn test_truncated_document() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"><CHAPTER cnumber="1">
            <VERS vnumber="1">In the beginning"#;
        let err = parse_document(xml).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_mismatched_end_tag() {
        let xml = r#"<XMLBIBLE><BIBLEBOOK bnumber="1"></CHAPTER></XMLBIBLE>"#;
        let err = parse_document(xml).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_verse_outside_chapter_ignored() {
        let xml = r#"<XMLBIBLE>
            <VERS vnumber="1">stray</VERS>
            <BIBLEBOOK bnumber="1"><CHAPTER cnumber="1">
                <VERS vnumber="1">kept</VERS>
            </CHAPTER></BIBLEBOOK>
        </XMLBIBLE>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(doc.verse_count(), 1);
        assert_eq!(doc.books[0].chapters[0].verses[0].text, "kept");
    }

    #[test]
    fn test_header_text_not_attributed_to_verses() {
        let doc = parse_document(SAMPLE).unwrap();
        for book in &doc.books {
            for chapter in &book.chapters {
                for verse in &chapter.verses {
                    assert!(!verse.text.contains("King James"));
                }
            }
        }
    }
}
