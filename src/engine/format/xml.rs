//! JSON ⇄ XML using the xml2js conventions: object keys are child elements,
//! arrays repeat the element, `$` holds attributes and `_` holds text.

use crate::config::options::XmlOptions;
use crate::engine::format::display_text;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::Validate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

const ATTRIBUTES_KEY: &str = "$";
const TEXT_KEY: &str = "_";
const ARRAY_ITEM_TAG: &str = "item";

pub fn structured_to_xml(value: &Value, options: &XmlOptions) -> Result<String> {
    options.validate().map_err(|e| e.in_operation("structuredToXml"))?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_element(&mut writer, &options.root_name, value)?;

    String::from_utf8(writer.into_inner()).map_err(|e| ConvertError::format("structuredToXml", e))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ConvertError::format("structuredToXml", e))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::String(text) if text.is_empty() => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Array(items) => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for item in items {
                write_element(writer, ARRAY_ITEM_TAG, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        Value::Object(map) => write_object(writer, name, map),
        scalar => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&display_text(scalar))))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn write_object(writer: &mut Writer<Vec<u8>>, name: &str, map: &Map<String, Value>) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(Value::Object(attributes)) = map.get(ATTRIBUTES_KEY) {
        for (key, value) in attributes {
            let value = display_text(value);
            start.push_attribute((key.as_str(), value.as_str()));
        }
    }

    let text = map.get(TEXT_KEY).map(display_text);
    let mut children = map
        .iter()
        .filter(|(key, _)| key.as_str() != ATTRIBUTES_KEY && key.as_str() != TEXT_KEY)
        .peekable();

    if text.is_none() && children.peek().is_none() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = text {
        emit(writer, Event::Text(BytesText::new(&text)))?;
    }
    for (key, child) in children {
        match child {
            Value::Array(items) => {
                for item in items {
                    write_element(writer, key, item)?;
                }
            }
            other => write_element(writer, key, other)?,
        }
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
        let mut fields = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| ConvertError::parse("xmlToStructured", e))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| ConvertError::parse("xmlToStructured", e))?;
            insert_merged(&mut fields, key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(&normalized);
    }

    fn into_value(self) -> (String, Value) {
        let Self {
            name,
            mut fields,
            text,
        } = self;
        if fields.is_empty() {
            return (name, Value::String(text));
        }
        if !text.is_empty() {
            insert_merged(&mut fields, TEXT_KEY.to_string(), Value::String(text));
        }
        (name, Value::Object(fields))
    }
}

/// A second occurrence of a key turns its value into a list.
fn insert_merged(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Tag names are lower-cased, text is whitespace-normalized, values stay
/// strings. A tag seen once maps to a value, a tag seen twice to a list, so
/// the two shapes do not round-trip to the same structure.
pub fn xml_to_structured(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Map<String, Value>> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ConvertError::parse("xmlToStructured", e))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => close(Frame::open(&start)?, &mut stack, &mut root)?,
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    ConvertError::parse("xmlToStructured", "closing tag without an open element")
                })?;
                close(frame, &mut stack, &mut root)?;
            }
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|e| ConvertError::parse("xmlToStructured", e))?;
                match stack.last_mut() {
                    Some(frame) => frame.push_text(&content),
                    None if content.trim().is_empty() => {}
                    None => {
                        return Err(ConvertError::parse(
                            "xmlToStructured",
                            "text outside of the root element",
                        ))
                    }
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame.push_text(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::parse(
            "xmlToStructured",
            format!("element <{}> is never closed", open.name),
        ));
    }

    root.map(Value::Object)
        .ok_or_else(|| ConvertError::parse("xmlToStructured", "document has no root element"))
}

fn close(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<Map<String, Value>>,
) -> Result<()> {
    let (name, value) = frame.into_value();
    match stack.last_mut() {
        Some(parent) => insert_merged(&mut parent.fields, name, value),
        None if root.is_none() => {
            let mut document = Map::new();
            document.insert(name, value);
            *root = Some(document);
        }
        None => {
            return Err(ConvertError::parse(
                "xmlToStructured",
                format!("second root element <{}>", name),
            ))
        }
    }
    Ok(())
}
