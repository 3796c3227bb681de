//! Builtin handlers, one per entity kind

use super::content::serialize_content;
use super::Serializer;
use crate::backend::XmlBackend;
use crate::errors::SerializationResult;
use crate::model::{ElementKind, ElementRef, TMX_VERSION};

type HandlerResult<B> = SerializationResult<Option<<B as XmlBackend>::Node>>;

pub fn tmx<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Tmx(tmx) = element else {
        return ser.invalid_object_type(ElementKind::Tmx, element.kind());
    };
    let backend = ser.backend();
    ser.check_version(&tmx.version)?;

    let node = backend.make_node("tmx");
    backend.set_attribute(&node, "version", TMX_VERSION);
    ser.append(&node, &tmx.header)?;

    let body = backend.make_node("body");
    for tu in &tmx.body {
        ser.append(&body, tu)?;
    }
    backend.append_child(&node, &body);
    Ok(Some(node))
}

pub fn header<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Header(header) = element else {
        return ser.invalid_object_type(ElementKind::Header, element.kind());
    };
    let node = ser.backend().make_node("header");
    ser.set_required_str(&node, "creationtool", &header.creationtool)?;
    ser.set_required_str(&node, "creationtoolversion", &header.creationtoolversion)?;
    ser.set_required_str(&node, "segtype", header.segtype.as_str())?;
    ser.set_required_str(&node, "o-tmf", &header.tmf)?;
    ser.set_required_str(&node, "adminlang", &header.adminlang)?;
    ser.set_required_str(&node, "srclang", &header.srclang)?;
    ser.set_required_str(&node, "datatype", &header.datatype)?;
    ser.set_optional_str(&node, "o-encoding", header.encoding.as_deref());
    ser.set_optional_date(&node, "creationdate", header.creationdate.as_ref());
    ser.set_optional_str(&node, "creationid", header.creationid.as_deref());
    ser.set_optional_date(&node, "changedate", header.changedate.as_ref());
    ser.set_optional_str(&node, "changeid", header.changeid.as_deref());
    for note in &header.notes {
        ser.append(&node, note)?;
    }
    for prop in &header.props {
        ser.append(&node, prop)?;
    }
    Ok(Some(node))
}

pub fn tu<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Tu(tu) = element else {
        return ser.invalid_object_type(ElementKind::Tu, element.kind());
    };
    let node = ser.backend().make_node("tu");
    ser.set_optional_str(&node, "tuid", tu.tuid.as_deref());
    ser.set_optional_str(&node, "o-encoding", tu.encoding.as_deref());
    ser.set_optional_str(&node, "datatype", tu.datatype.as_deref());
    ser.set_optional_int(&node, "usagecount", tu.usagecount);
    ser.set_optional_date(&node, "lastusagedate", tu.lastusagedate.as_ref());
    ser.set_optional_str(&node, "creationtool", tu.creationtool.as_deref());
    ser.set_optional_str(&node, "creationtoolversion", tu.creationtoolversion.as_deref());
    ser.set_optional_date(&node, "creationdate", tu.creationdate.as_ref());
    ser.set_optional_str(&node, "creationid", tu.creationid.as_deref());
    ser.set_optional_date(&node, "changedate", tu.changedate.as_ref());
    ser.set_optional_str(&node, "segtype", tu.segtype.map(|segtype| segtype.as_str()));
    ser.set_optional_str(&node, "changeid", tu.changeid.as_deref());
    ser.set_optional_str(&node, "o-tmf", tu.tmf.as_deref());
    ser.set_optional_str(&node, "srclang", tu.srclang.as_deref());
    for note in &tu.notes {
        ser.append(&node, note)?;
    }
    for prop in &tu.props {
        ser.append(&node, prop)?;
    }
    for tuv in &tu.variants {
        ser.append(&node, tuv)?;
    }
    Ok(Some(node))
}

pub fn tuv<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Tuv(tuv) = element else {
        return ser.invalid_object_type(ElementKind::Tuv, element.kind());
    };
    let backend = ser.backend();
    let node = backend.make_node("tuv");
    ser.set_required_str(&node, "xml:lang", &tuv.lang)?;
    ser.set_optional_str(&node, "o-encoding", tuv.encoding.as_deref());
    ser.set_optional_str(&node, "datatype", tuv.datatype.as_deref());
    ser.set_optional_int(&node, "usagecount", tuv.usagecount);
    ser.set_optional_date(&node, "lastusagedate", tuv.lastusagedate.as_ref());
    ser.set_optional_str(&node, "creationtool", tuv.creationtool.as_deref());
    ser.set_optional_str(&node, "creationtoolversion", tuv.creationtoolversion.as_deref());
    ser.set_optional_date(&node, "creationdate", tuv.creationdate.as_ref());
    ser.set_optional_str(&node, "creationid", tuv.creationid.as_deref());
    ser.set_optional_date(&node, "changedate", tuv.changedate.as_ref());
    ser.set_optional_str(&node, "changeid", tuv.changeid.as_deref());
    ser.set_optional_str(&node, "o-tmf", tuv.tmf.as_deref());
    for note in &tuv.notes {
        ser.append(&node, note)?;
    }
    for prop in &tuv.props {
        ser.append(&node, prop)?;
    }

    let seg = backend.make_node("seg");
    serialize_content(ser, &seg, &tuv.content)?;
    backend.append_child(&node, &seg);
    Ok(Some(node))
}

pub fn note<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Note(note) = element else {
        return ser.invalid_object_type(ElementKind::Note, element.kind());
    };
    let backend = ser.backend();
    let node = backend.make_node("note");
    ser.set_optional_str(&node, "xml:lang", note.lang.as_deref());
    ser.set_optional_str(&node, "o-encoding", note.encoding.as_deref());
    ser.set_required_text(&node, note.text.as_deref())?;
    Ok(Some(node))
}

pub fn prop<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Prop(prop) = element else {
        return ser.invalid_object_type(ElementKind::Prop, element.kind());
    };
    let backend = ser.backend();
    let node = backend.make_node("prop");
    ser.set_required_str(&node, "type", &prop.kind)?;
    ser.set_optional_str(&node, "xml:lang", prop.lang.as_deref());
    ser.set_optional_str(&node, "o-encoding", prop.encoding.as_deref());
    ser.set_required_text(&node, prop.text.as_deref())?;
    Ok(Some(node))
}

pub fn bpt<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Bpt(bpt) = element else {
        return ser.invalid_object_type(ElementKind::Bpt, element.kind());
    };
    let node = ser.backend().make_node("bpt");
    ser.set_optional_int(&node, "i", Some(bpt.i));
    ser.set_optional_int(&node, "x", bpt.x);
    ser.set_optional_str(&node, "type", bpt.kind.as_deref());
    serialize_content(ser, &node, &bpt.content)?;
    Ok(Some(node))
}

pub fn ept<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Ept(ept) = element else {
        return ser.invalid_object_type(ElementKind::Ept, element.kind());
    };
    let node = ser.backend().make_node("ept");
    ser.set_optional_int(&node, "i", Some(ept.i));
    serialize_content(ser, &node, &ept.content)?;
    Ok(Some(node))
}

pub fn it<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::It(it) = element else {
        return ser.invalid_object_type(ElementKind::It, element.kind());
    };
    let node = ser.backend().make_node("it");
    ser.set_required_str(&node, "pos", it.pos.as_str())?;
    ser.set_optional_int(&node, "x", it.x);
    ser.set_optional_str(&node, "type", it.kind.as_deref());
    serialize_content(ser, &node, &it.content)?;
    Ok(Some(node))
}

pub fn ph<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Ph(ph) = element else {
        return ser.invalid_object_type(ElementKind::Ph, element.kind());
    };
    let node = ser.backend().make_node("ph");
    ser.set_optional_int(&node, "x", ph.x);
    ser.set_optional_str(&node, "type", ph.kind.as_deref());
    ser.set_optional_str(&node, "assoc", ph.assoc.map(|assoc| assoc.as_str()));
    serialize_content(ser, &node, &ph.content)?;
    Ok(Some(node))
}

pub fn hi<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Hi(hi) = element else {
        return ser.invalid_object_type(ElementKind::Hi, element.kind());
    };
    let node = ser.backend().make_node("hi");
    ser.set_optional_int(&node, "x", hi.x);
    ser.set_optional_str(&node, "type", hi.kind.as_deref());
    serialize_content(ser, &node, &hi.content)?;
    Ok(Some(node))
}

pub fn sub<B: XmlBackend>(ser: &Serializer<B>, element: ElementRef<'_>) -> HandlerResult<B> {
    let ElementRef::Sub(sub) = element else {
        return ser.invalid_object_type(ElementKind::Sub, element.kind());
    };
    let node = ser.backend().make_node("sub");
    ser.set_optional_str(&node, "datatype", sub.datatype.as_deref());
    ser.set_optional_str(&node, "type", sub.kind.as_deref());
    serialize_content(ser, &node, &sub.content)?;
    Ok(Some(node))
}
