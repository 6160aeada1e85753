//! Bible XML reader.
//!
//! Pipeline:
//!   raw bytes
//!     └─ quick-xml event stream
//!          └─ DocumentBuilder::open / close / text
//!               └─ Bible
//!
//! Expected shape (element names are matched on their local part):
//!
//! ```xml
//! <bible translation="...">
//!   <testament name="Old">
//!     <book number="1">
//!       <chapter number="1">
//!         <verse number="1">In the beginning ...</verse>
//! ```
//!
//! Elements other than these four are transparent: their text still counts
//! towards the enclosing verse.

use std::collections::BTreeSet;

use lectio_core::{
  books,
  model::{Bible, Book, Chapter, Testament, TestamentName, Verse},
};
use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

use crate::error::{Error, Result};

// ─── Element classification ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
  Testament,
  Book,
  Chapter,
  Verse,
  Other,
}

fn local_name(name: &[u8]) -> &[u8] {
  // strip "prefix:" if present
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

fn classify(name: &[u8]) -> Element {
  match local_name(name) {
    b"testament" => Element::Testament,
    b"book" => Element::Book,
    b"chapter" => Element::Chapter,
    b"verse" => Element::Verse,
    _ => Element::Other,
  }
}

// ─── Attribute helpers ───────────────────────────────────────────────────────

fn optional_attr(
  e: &BytesStart<'_>,
  attribute: &'static str,
  position: u64,
) -> Result<Option<String>> {
  let xml_err = |message: String| Error::Xml { position, message };
  let Some(attr) = e
    .try_get_attribute(attribute)
    .map_err(|err| xml_err(err.to_string()))?
  else {
    return Ok(None);
  };
  let value = attr
    .unescape_value()
    .map_err(|err| xml_err(err.to_string()))?;
  Ok(Some(value.into_owned()))
}

fn required_attr(
  e: &BytesStart<'_>,
  element: &'static str,
  attribute: &'static str,
  position: u64,
) -> Result<String> {
  optional_attr(e, attribute, position)?
    .ok_or(Error::MissingAttribute { element, attribute })
}

fn required_number(
  e: &BytesStart<'_>,
  element: &'static str,
  position: u64,
) -> Result<u32> {
  let value = required_attr(e, element, "number", position)?;
  value.trim().parse().map_err(|_| Error::InvalidNumber {
    element,
    attribute: "number",
    value,
  })
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Accumulates the document as events arrive. Each level is held open in its
/// own slot and flushed into its parent when the element closes.
#[derive(Default)]
struct DocumentBuilder {
  root_seen:   bool,
  translation: String,
  /// Book numbers already opened anywhere in the document.
  seen_books:  BTreeSet<u32>,
  testaments:  Vec<Testament>,
  testament:   Option<Testament>,
  book:        Option<Book>,
  chapter:     Option<Chapter>,
  verse:       Option<Verse>,
}

impl DocumentBuilder {
  fn open(&mut self, e: &BytesStart<'_>, position: u64) -> Result<()> {
    if !self.root_seen {
      self.root_seen = true;
      self.translation =
        optional_attr(e, "translation", position)?.unwrap_or_default();
      return Ok(());
    }

    match classify(e.name().as_ref()) {
      Element::Testament => {
        if self.testament.is_some() {
          return Err(Error::Misplaced {
            element: "testament",
            parent:  "bible",
          });
        }
        let raw = required_attr(e, "testament", "name", position)?;
        let name = raw
          .parse::<TestamentName>()
          .map_err(|_| Error::InvalidTestament(raw))?;
        self.testament = Some(Testament {
          name,
          books: Vec::new(),
        });
      }
      Element::Book => {
        if self.testament.is_none() || self.book.is_some() {
          return Err(Error::Misplaced {
            element: "book",
            parent:  "testament",
          });
        }
        let number = required_number(e, "book", position)?;
        self.check_book(number)?;
        self.book = Some(Book {
          number,
          chapters: Vec::new(),
        });
      }
      Element::Chapter => {
        if self.book.is_none() || self.chapter.is_some() {
          return Err(Error::Misplaced {
            element: "chapter",
            parent:  "book",
          });
        }
        self.chapter = Some(Chapter {
          number: required_number(e, "chapter", position)?,
          verses: Vec::new(),
        });
      }
      Element::Verse => {
        if self.chapter.is_none() || self.verse.is_some() {
          return Err(Error::Misplaced {
            element: "verse",
            parent:  "chapter",
          });
        }
        self.verse = Some(Verse::new(
          required_number(e, "verse", position)?,
          String::new(),
        ));
      }
      Element::Other => {}
    }
    Ok(())
  }

  /// Book numbers are canonical, unique, and filed under the testament
  /// they belong to.
  fn check_book(&mut self, number: u32) -> Result<()> {
    if !books::OLD_TESTAMENT.contains(&number) && !books::NEW_TESTAMENT.contains(&number) {
      return Err(Error::UnknownBook(number));
    }
    let expected = TestamentName::for_book(number);
    if let Some(testament) = &self.testament
      && testament.name != expected
    {
      return Err(Error::WrongTestament {
        book: number,
        expected,
        found: testament.name,
      });
    }
    if !self.seen_books.insert(number) {
      return Err(Error::DuplicateBook(number));
    }
    Ok(())
  }

  fn close(&mut self, element: Element) {
    match element {
      Element::Verse => {
        if let (Some(verse), Some(chapter)) =
          (self.verse.take(), self.chapter.as_mut())
        {
          chapter.verses.push(verse);
        }
      }
      Element::Chapter => {
        if let (Some(chapter), Some(book)) =
          (self.chapter.take(), self.book.as_mut())
        {
          book.chapters.push(chapter);
        }
      }
      Element::Book => {
        if let (Some(book), Some(testament)) =
          (self.book.take(), self.testament.as_mut())
        {
          testament.books.push(book);
        }
      }
      Element::Testament => {
        if let Some(testament) = self.testament.take() {
          self.testaments.push(testament);
        }
      }
      Element::Other => {}
    }
  }

  fn text(&mut self, text: &str) {
    if let Some(verse) = self.verse.as_mut() {
      verse.text.push_str(text);
    }
  }

  fn finish(self) -> Result<Bible> {
    if !self.root_seen {
      return Err(Error::EmptyDocument);
    }
    if self.verse.is_some() {
      return Err(Error::UnexpectedEof("verse"));
    }
    if self.chapter.is_some() {
      return Err(Error::UnexpectedEof("chapter"));
    }
    if self.book.is_some() {
      return Err(Error::UnexpectedEof("book"));
    }
    if self.testament.is_some() {
      return Err(Error::UnexpectedEof("testament"));
    }
    Ok(Bible {
      translation: self.translation,
      testaments:  self.testaments,
    })
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse_bible(xml: &[u8]) -> Result<Bible> {
  let mut reader = Reader::from_reader(xml);
  let mut builder = DocumentBuilder::default();
  let mut buf = Vec::new();

  loop {
    let position = reader.buffer_position() as u64;
    let xml_err = |message: String| Error::Xml { position, message };

    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => builder.open(e, position)?,
      Ok(Event::Empty(ref e)) => {
        builder.open(e, position)?;
        builder.close(classify(e.name().as_ref()));
      }
      Ok(Event::End(ref e)) => builder.close(classify(e.name().as_ref())),
      Ok(Event::Text(ref t)) => {
        let text = t.unescape().map_err(|err| xml_err(err.to_string()))?;
        builder.text(&text);
      }
      Ok(Event::CData(ref c)) => builder.text(&String::from_utf8_lossy(c)),
      Ok(Event::Eof) => break,
      Err(err) => return Err(xml_err(err.to_string())),
      _ => {}
    }
    buf.clear();
  }

  builder.finish()
}
