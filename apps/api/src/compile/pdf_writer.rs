//! Plain PDF writer used by the built-in renderer and the `pdf` export.
//!
//! Standard Type1 fonts only, so no font files are embedded. Text is encoded as
//! WinAnsi; characters outside it become `?`.

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 36;
const BULLET_INDENT: i64 = 12;
const CONTINUATION_INDENT: i64 = 8;
/// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_EM: f64 = 0.52;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// One paragraph of an unstyled document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Strong(String),
    Text(String),
    Bullet(String),
}

impl Block {
    fn text(&self) -> &str {
        match self {
            Block::Title(t)
            | Block::Heading(t)
            | Block::Strong(t)
            | Block::Text(t)
            | Block::Bullet(t) => t,
        }
    }

    fn style(&self) -> Style {
        match self {
            Block::Title(_) => Style::new(BOLD, 18, 22, 0, 0),
            Block::Heading(_) => Style::new(BOLD, 12, 16, 8, 0),
            Block::Strong(_) => Style::new(BOLD, 10, 13, 3, 0),
            Block::Text(_) => Style::new(REGULAR, 10, 13, 2, 0),
            Block::Bullet(_) => Style::new(REGULAR, 10, 13, 0, BULLET_INDENT),
        }
    }
}

/// An ordered list of blocks; empty text blocks are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainDocument {
    pub blocks: Vec<Block>,
}

impl PlainDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        if !block.text().trim().is_empty() {
            self.blocks.push(block);
        }
        self
    }

    /// One text block per non-blank line.
    pub fn from_paragraphs(text: &str) -> Self {
        let mut doc = Self::new();
        for line in text.lines() {
            doc.push(Block::Text(line.trim().to_string()));
        }
        doc
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// Lines that do not fit on the first page are dropped.
    SinglePage,
    Unbounded,
}

#[derive(Debug, Clone)]
pub struct WrittenPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    font: &'static str,
    size: i64,
    leading: i64,
    space_before: i64,
    indent: i64,
}

impl Style {
    const fn new(font: &'static str, size: i64, leading: i64, space_before: i64, indent: i64) -> Self {
        Self {
            font,
            size,
            leading,
            space_before,
            indent,
        }
    }

    fn max_chars(&self, extra_indent: i64) -> usize {
        let width = (PAGE_WIDTH - 2 * MARGIN - self.indent - extra_indent) as f64;
        ((width / (self.size as f64 * AVG_GLYPH_EM)) as usize).max(1)
    }
}

struct PlacedLine {
    font: &'static str,
    size: i64,
    x: i64,
    y: i64,
    text: String,
}

pub fn write_pdf(document: &PlainDocument, limit: PageLimit) -> Result<WrittenPdf> {
    let pages = layout(document, limit);
    let page_count = pages.len();
    let bytes = assemble(&pages)?;
    Ok(WrittenPdf { bytes, page_count })
}

/// Page count of an arbitrary PDF payload, if it parses.
pub fn count_pages(bytes: &[u8]) -> Option<usize> {
    Document::load_mem(bytes).ok().map(|doc| doc.get_pages().len())
}

fn layout(document: &PlainDocument, limit: PageLimit) -> Vec<Vec<PlacedLine>> {
    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut y = PAGE_HEIGHT - MARGIN;

    'blocks: for block in &document.blocks {
        let style = block.style();
        let is_bullet = matches!(block, Block::Bullet(_));
        let lines = if is_bullet {
            wrap(block.text(), style.max_chars(CONTINUATION_INDENT))
        } else {
            wrap(block.text(), style.max_chars(0))
        };

        for (i, line) in lines.into_iter().enumerate() {
            let gap = if i == 0 { style.space_before } else { 0 };
            let mut next_y = y - gap - style.leading;
            if next_y < MARGIN {
                match limit {
                    PageLimit::SinglePage => break 'blocks,
                    PageLimit::Unbounded => {
                        pages.push(Vec::new());
                        y = PAGE_HEIGHT - MARGIN;
                        next_y = y - style.leading;
                    }
                }
            }

            let (x, text) = match (is_bullet, i) {
                (true, 0) => (MARGIN + style.indent, format!("\u{2022} {line}")),
                (true, _) => (MARGIN + style.indent + CONTINUATION_INDENT, line),
                (false, _) => (MARGIN + style.indent, line),
            };
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    font: style.font,
                    size: style.size,
                    x,
                    y: next_y + (style.leading - style.size),
                    text,
                });
            }
            y = next_y;
        }
    }

    pages
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut rest: Vec<char> = word.chars().collect();
        while !rest.is_empty() {
            let needed = if current.is_empty() {
                rest.len()
            } else {
                current_len + 1 + rest.len()
            };
            if needed <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current_len += rest.len();
                current.extend(rest.drain(..));
            } else if current.is_empty() {
                current.extend(rest.drain(..max_chars));
                lines.push(std::mem::take(&mut current));
            } else {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if c.is_control() => b' ',
            c if (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c) => c as u8,
            _ => b'?',
        })
        .collect()
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(lines: &[PlacedLine]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(line.font.as_bytes().to_vec()), Object::Integer(line.size)],
        ));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(line.x), Object::Integer(line.y)],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn assemble(pages: &[Vec<PlacedLine>]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
