//! Paginated PDF rendering of a conversation.
//!
//! Layout is computed first ([`layout`]) and then written out with `lopdf`.
//! Body text is Courier, so a line holds exactly [`COLUMNS`] characters and
//! wrapping can be done on character counts. No dates or random IDs go into
//! the file: the same conversation always produces the same bytes.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::ExportError;
use super::sanitize::sanitize;
use crate::inference::{Message, Role};

pub const DOCUMENT_TITLE: &str = "Chat History";

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
/// About 15 mm on every side.
pub const MARGIN: f32 = 42.0;
pub const FONT_SIZE: f32 = 11.0;
pub const LINE_HEIGHT: f32 = 14.0;
/// Extra space after each message.
pub const ENTRY_GAP: f32 = 6.0;
/// 511 pt of usable width over Courier's 0.6 em advance at 11 pt.
pub const COLUMNS: usize = 77;

/// One line of text at its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// True for the first line of a message (the one carrying the label).
    pub starts_entry: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// `"You: text"` wrapped to the page width. Hard newlines are kept.
fn entry_lines(message: &Message) -> Vec<String> {
    let body = format!("{}: {}", message.role.label(), sanitize(&message.text));
    let options = textwrap::Options::new(COLUMNS).break_words(true);
    body.split('\n')
        .flat_map(|line| {
            textwrap::wrap(line, &options)
                .into_iter()
                .map(|part| part.into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Places every non-system message on pages, starting a new page whenever
/// the next line would cross the bottom margin. Always returns at least one page.
pub fn layout(messages: &[Message]) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut top = PAGE_HEIGHT - MARGIN;

    for message in messages.iter().filter(|m| m.role != Role::System) {
        for (n, text) in entry_lines(message).into_iter().enumerate() {
            if top - LINE_HEIGHT < MARGIN {
                pages.push(std::mem::take(&mut current));
                top = PAGE_HEIGHT - MARGIN;
            }
            current.lines.push(PlacedLine {
                text,
                x: MARGIN,
                y: top - FONT_SIZE,
                starts_entry: n == 0,
            });
            top -= LINE_HEIGHT;
        }
        top -= ENTRY_GAP;
    }

    pages.push(current);
    pages
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        let text = Object::string_literal(line.text.clone());
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("Td", vec![line.x.into(), line.y.into()]),
            Operation::new("Tj", vec![text]),
            Operation::new("ET", vec![]),
        ]);
    }
    Content { operations }
}

/// Renders the conversation as a PDF document and returns its bytes.
pub fn export(messages: &[Message]) -> Result<Vec<u8>, ExportError> {
    let pages = layout(messages);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = page_content(page);
        let stream = Stream::new(dictionary! {}, content.encode()?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(DOCUMENT_TITLE),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
