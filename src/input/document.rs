//! Qt Linguist `.ts` document model.
//!
//! Reads and writes the XML layout produced by `lupdate`:
//!
//! ```xml
//! <TS version="2.0" language="ru_RU">
//! <context>
//!     <name>LeechCraft::Liznoo::Plugin</name>
//!     <message>
//!         <location filename="liznoo.cpp" line="72"/>
//!         <source>Suspend</source>
//!         <translation>Ждущий режим</translation>
//!     </message>
//! </context>
//! </TS>
//! ```

use std::io::{
    Read,
    Write,
};

use thiserror::Error;
use xml::reader::{
    ParserConfig,
    XmlEvent,
};
use xmltree::{
    Element,
    EmitterConfig,
    XMLNode,
};

use crate::ir::key::MessageKey;
use crate::ir::translation::{
    TranslationEntry,
    TranslationStatus,
    TranslationText,
};
use crate::types::SourceLocation;

/// Version written when a document does not carry one.
const DEFAULT_VERSION: &str = "2.1";

/// `lupdate` always emits this preamble; xmltree cannot write a doctype itself.
const PREAMBLE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

const INDENT: &str = "    ";

/// Structural problems in a `.ts` document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid XML: {0}")]
    Xml(String),

    #[error("Expected root element <TS>, found <{0}>")]
    UnexpectedRoot(String),

    #[error("<{parent}> is missing required <{element}>")]
    MissingElement { parent: &'static str, element: &'static str },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute { element: &'static str, attribute: &'static str, value: String },

    #[error("Invalid character reference '{0}' in <byte>")]
    InvalidByte(String),

    #[error("Failed to write document: {0}")]
    Write(String),
}

/// A parsed `.ts` file: root attributes plus context blocks in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TsDocument {
    pub version: Option<String>,
    /// Target language, e.g. `ru_RU`.
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<ContextBlock>,
}

/// One `<context>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextBlock {
    pub name: String,
    pub entries: Vec<TranslationEntry>,
}

impl TsDocument {
    /// # Errors
    /// Returns [`DocumentError`] if the text is not a well-formed `.ts` document.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Self::from_reader(text.as_bytes())
    }

    /// # Errors
    /// Returns [`DocumentError`] if the input is not a well-formed `.ts` document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DocumentError> {
        Self::from_element(read_tree(reader)?)
    }

    fn from_element(mut root: Element) -> Result<Self, DocumentError> {
        if root.name != "TS" {
            return Err(DocumentError::UnexpectedRoot(root.name));
        }

        let mut document = Self {
            version: root.attributes.remove("version"),
            language: root.attributes.remove("language").filter(|l| !l.is_empty()),
            source_language: root.attributes.remove("sourcelanguage").filter(|l| !l.is_empty()),
            contexts: Vec::new(),
        };

        for child in root.children {
            let XMLNode::Element(child) = child else {
                continue;
            };
            if child.name == "context" {
                document.contexts.push(parse_context(child)?);
            } else {
                // defaultcodec, dependencies and extra-* carry nothing we use
                tracing::debug!(element = %child.name, "Skipping element in <TS>");
            }
        }

        Ok(document)
    }

    /// All messages in document order.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.contexts.iter().flat_map(|context| context.entries.iter())
    }

    /// Builds the XML tree for this document.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("TS");
        root.attributes.insert(
            "version".to_string(),
            self.version.clone().unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        );
        if let Some(language) = &self.language {
            root.attributes.insert("language".to_string(), language.clone());
        }
        if let Some(source_language) = &self.source_language {
            root.attributes.insert("sourcelanguage".to_string(), source_language.clone());
        }

        for context in &self.contexts {
            let mut element = Element::new("context");
            push_indented(&mut element, text_element("name", &context.name), 1);
            for entry in &context.entries {
                push_indented(&mut element, message_element(entry), 1);
            }
            close_indented(&mut element, 0);
            push_indented(&mut root, element, 0);
        }
        close_indented(&mut root, 0);

        root
    }

    /// Writes the document in `lupdate` layout.
    ///
    /// Layout whitespace is part of the tree, so text-bearing elements are
    /// never re-indented by the emitter.
    ///
    /// # Errors
    /// Returns [`DocumentError::Write`] if the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), DocumentError> {
        let to_write_error = |e: std::io::Error| DocumentError::Write(e.to_string());

        writer.write_all(PREAMBLE.as_bytes()).map_err(to_write_error)?;
        let config =
            EmitterConfig::new().perform_indent(false).write_document_declaration(false);
        self.to_element()
            .write_with_config(&mut writer, config)
            .map_err(|e| DocumentError::Write(e.to_string()))?;
        writer.write_all(b"\n").map_err(to_write_error)
    }

    /// # Errors
    /// Returns [`DocumentError::Write`] if serialization fails.
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DocumentError::Write(e.to_string()))
    }
}

/// Builds the element tree, keeping whitespace-only character data.
///
/// Whitespace between structural elements ends up as text nodes too; every
/// reader below only looks at the element children there.
fn read_tree<R: Read>(reader: R) -> Result<Element, DocumentError> {
    let events = ParserConfig::new()
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .create_reader(reader);

    let mut open: Vec<Element> = Vec::new();
    let mut root = None;
    for event in events {
        match event.map_err(|e| DocumentError::Xml(e.to_string()))? {
            XmlEvent::StartElement { name, attributes, .. } => {
                let mut element = Element::new(&name.local_name);
                for attribute in attributes {
                    element.attributes.insert(attribute.name.local_name, attribute.value);
                }
                open.push(element);
            }
            XmlEvent::EndElement { .. } => {
                let Some(element) = open.pop() else {
                    continue;
                };
                match open.last_mut() {
                    Some(parent) => parent.children.push(XMLNode::Element(element)),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                if let Some(parent) = open.last_mut() {
                    parent.children.push(XMLNode::Text(text));
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| DocumentError::Xml("no root element".to_string()))
}

fn parse_context(element: Element) -> Result<ContextBlock, DocumentError> {
    let mut name = None;
    let mut messages = Vec::new();

    for child in element.children {
        let XMLNode::Element(child) = child else {
            continue;
        };
        if child.name == "name" {
            name = Some(text_content(&child)?);
        } else if child.name == "message" {
            messages.push(child);
        }
    }

    let name = name.ok_or(DocumentError::MissingElement { parent: "context", element: "name" })?;
    let entries =
        messages.into_iter().map(|message| parse_message(&name, message)).collect::<Result<_, _>>()?;

    Ok(ContextBlock { name, entries })
}

fn parse_message(context: &str, mut element: Element) -> Result<TranslationEntry, DocumentError> {
    let numerus = match element.attributes.remove("numerus") {
        None => false,
        Some(value) => match parse_yes_no(&value) {
            Some(flag) => flag,
            None => {
                return Err(DocumentError::InvalidAttribute {
                    element: "message",
                    attribute: "numerus",
                    value,
                });
            }
        },
    };

    let mut source = None;
    let mut disambiguation = None;
    let mut translation = None;
    let mut entry = TranslationEntry::default();

    for child in element.children {
        let XMLNode::Element(child) = child else {
            continue;
        };
        match child.name.as_str() {
            "location" => entry.locations.push(parse_location(&child)?),
            "source" => source = Some(text_content(&child)?),
            "comment" => disambiguation = Some(text_content(&child)?),
            "extracomment" => entry.extra_comment = Some(text_content(&child)?),
            "translatorcomment" => entry.translator_comment = Some(text_content(&child)?),
            "translation" => translation = Some(parse_translation(&child, numerus)?),
            // oldsource, oldcomment, userdata, extra-*
            _ => {}
        }
    }

    let source =
        source.ok_or(DocumentError::MissingElement { parent: "message", element: "source" })?;
    let mut key = MessageKey::new(context, source);
    if let Some(disambiguation) = disambiguation {
        key = key.with_disambiguation(disambiguation);
    }
    entry.key = key;

    // No <translation> at all is how lupdate spells "never translated"
    let (text, status) = translation.unwrap_or_else(|| {
        let text = if numerus { TranslationText::Numerus(Vec::new()) } else { TranslationText::default() };
        (text, TranslationStatus::Unfinished)
    });
    entry.translation = text;
    entry.status = status;

    Ok(entry)
}

fn parse_translation(
    element: &Element,
    numerus: bool,
) -> Result<(TranslationText, TranslationStatus), DocumentError> {
    let status = match element.attributes.get("type") {
        None => TranslationStatus::Finished,
        Some(value) => TranslationStatus::from_attr(value).ok_or_else(|| {
            DocumentError::InvalidAttribute {
                element: "translation",
                attribute: "type",
                value: value.clone(),
            }
        })?,
    };

    let text = if numerus {
        let forms = child_elements(element, "numerusform")
            .map(variant_text)
            .collect::<Result<Vec<_>, _>>()?;
        TranslationText::Numerus(forms)
    } else {
        TranslationText::Single(variant_text(element)?)
    };

    Ok((text, status))
}

/// Text of an element that may hold `<lengthvariant>`s; the first (longest) one wins.
fn variant_text(element: &Element) -> Result<String, DocumentError> {
    match child_elements(element, "lengthvariant").next() {
        Some(variant) => text_content(variant),
        None => text_content(element),
    }
}

fn parse_location(element: &Element) -> Result<SourceLocation, DocumentError> {
    let line = match element.attributes.get("line") {
        None => None,
        Some(value) => Some(value.parse::<u32>().map_err(|_| DocumentError::InvalidAttribute {
            element: "location",
            attribute: "line",
            value: value.clone(),
        })?),
    };
    Ok(SourceLocation { filename: element.attributes.get("filename").cloned(), line })
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

fn child_elements<'a>(element: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> {
    element.children.iter().filter_map(move |node| match node {
        XMLNode::Element(child) if child.name == name => Some(child),
        _ => None,
    })
}

/// Concatenated character data of an element, with `<byte>` references decoded.
fn text_content(element: &Element) -> Result<String, DocumentError> {
    let mut text = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(s) | XMLNode::CData(s) => text.push_str(s),
            XMLNode::Element(child) if child.name == "byte" => {
                if let Some(c) = parse_byte(child)? {
                    text.push(c);
                }
            }
            _ => {}
        }
    }
    Ok(text)
}

// `value` is a decimal (`27`) or hex (`x1b`, `0x1b`) code point; zero means nothing
fn parse_byte(element: &Element) -> Result<Option<char>, DocumentError> {
    let value = element.attributes.get("value").map(String::as_str).unwrap_or_default();
    let invalid = || DocumentError::InvalidByte(value.to_string());

    let (digits, radix) = if let Some(hex) = value.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(hex) = value.strip_prefix('x') {
        (hex, 16)
    } else {
        (value, 10)
    };
    let code = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
    if code == 0 {
        return Ok(None);
    }
    char::from_u32(code).map(Some).ok_or_else(invalid)
}

const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' '..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Element with text content; characters XML cannot carry become `<byte>` elements.
fn text_element(name: &str, text: &str) -> Element {
    let mut element = Element::new(name);
    let mut run = String::new();
    for c in text.chars() {
        if is_xml_char(c) {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            element.children.push(XMLNode::Text(std::mem::take(&mut run)));
        }
        let mut byte = Element::new("byte");
        byte.attributes.insert("value".to_string(), format!("x{:x}", u32::from(c)));
        element.children.push(XMLNode::Element(byte));
    }
    if !run.is_empty() {
        element.children.push(XMLNode::Text(run));
    }
    element
}

fn push_indented(parent: &mut Element, child: Element, depth: usize) {
    parent.children.push(XMLNode::Text(format!("\n{}", INDENT.repeat(depth))));
    parent.children.push(XMLNode::Element(child));
}

fn close_indented(parent: &mut Element, depth: usize) {
    parent.children.push(XMLNode::Text(format!("\n{}", INDENT.repeat(depth))));
}

fn message_element(entry: &TranslationEntry) -> Element {
    let mut element = Element::new("message");
    if entry.is_numerus() {
        element.attributes.insert("numerus".to_string(), "yes".to_string());
    }

    for location in &entry.locations {
        let mut loc = Element::new("location");
        if let Some(filename) = &location.filename {
            loc.attributes.insert("filename".to_string(), filename.clone());
        }
        if let Some(line) = location.line {
            loc.attributes.insert("line".to_string(), line.to_string());
        }
        push_indented(&mut element, loc, 2);
    }

    push_indented(&mut element, text_element("source", &entry.key.source), 2);
    if let Some(disambiguation) = entry.key.disambiguation() {
        push_indented(&mut element, text_element("comment", disambiguation), 2);
    }
    if let Some(comment) = &entry.extra_comment {
        push_indented(&mut element, text_element("extracomment", comment), 2);
    }
    if let Some(comment) = &entry.translator_comment {
        push_indented(&mut element, text_element("translatorcomment", comment), 2);
    }

    let mut translation = match &entry.translation {
        TranslationText::Single(text) => text_element("translation", text),
        TranslationText::Numerus(forms) => {
            let mut translation = Element::new("translation");
            for form in forms {
                push_indented(&mut translation, text_element("numerusform", form), 3);
            }
            close_indented(&mut translation, 2);
            translation
        }
    };
    if let Some(status) = entry.status.as_attr() {
        translation.attributes.insert("type".to_string(), status.to_string());
    }
    push_indented(&mut element, translation, 2);
    close_indented(&mut element, 1);

    element
}
