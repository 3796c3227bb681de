//! Shared XML writer for every backend
//!
//! Elements with neither text nor children are written as empty tags
//! (`<prop type="x"/>`). Nothing is indented: whitespace between elements is
//! significant inside segments, so the writer never invents any.

use super::encoding::{declared_name, resolve_encoding, EncodedSink};
use super::XmlBackend;
use crate::errors::BackendResult;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Writes the XML declaration followed by `node`
pub fn write_document<B, W>(backend: &B, node: &B::Node, sink: W, encoding: &str) -> BackendResult<()>
where
    B: XmlBackend,
    W: Write,
{
    let encoding = resolve_encoding(encoding)?;
    let mut writer = Writer::new(EncodedSink::new(sink, encoding));
    write_declaration(&mut writer, declared_name(encoding))?;
    write_node(backend, node, &mut writer)?;
    let mut sink = writer.into_inner().finish()?;
    sink.flush()?;
    Ok(())
}

/// Writes `node` alone, without a declaration
pub fn write_fragment<B, W>(backend: &B, node: &B::Node, sink: W) -> BackendResult<()>
where
    B: XmlBackend,
    W: Write,
{
    let mut writer = Writer::new(sink);
    write_node(backend, node, &mut writer)
}

pub fn write_declaration<W: Write>(writer: &mut Writer<W>, encoding: &str) -> BackendResult<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding), None)))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Recursively writes `node`, its text, its children and their tails
pub fn write_node<B, W>(backend: &B, node: &B::Node, writer: &mut Writer<W>) -> BackendResult<()>
where
    B: XmlBackend,
    W: Write,
{
    let tag = backend.tag(node);
    let attributes = backend.attributes(node);
    let mut start = BytesStart::new(tag.as_str());
    for (key, value) in &attributes {
        // Clark keys outside the xml namespace have no prefix to write
        if key.starts_with('{') {
            log::debug!("skipping attribute '{}' on <{}>", key, tag);
            continue;
        }
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = backend.get_text(node).filter(|text| !text.is_empty());
    let children = backend.children(node, None);

    if text.is_none() && children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(&text)))?;
    }
    for child in &children {
        write_node(backend, child, writer)?;
        if let Some(tail) = backend.get_tail(child).filter(|tail| !tail.is_empty()) {
            writer.write_event(Event::Text(BytesText::new(&tail)))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}
