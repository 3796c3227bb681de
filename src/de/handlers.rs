//! Builtin handlers, one per TMX element
//!
//! Every handler follows the same order: tag check, stray text check
//! (structural elements only), attributes, then children. A required value
//! that policy chose to ignore ends the handler with `Ok(None)`.

use super::content::deserialize_content;
use super::Deserializer;
use crate::backend::XmlBackend;
use crate::errors::DeserializationResult;
use crate::model::{
    Bpt, CodePart, Ept, Header, Hi, It, Note, Ph, Pos, Prop, SegmentPart, Segtype, Sub, Tmx,
    TmxElement, Tu, Tuv,
};

type HandlerResult = DeserializationResult<Option<TmxElement>>;

// ============================================================================
// DOCUMENT
// ============================================================================

pub fn tmx<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "tmx")?;
    de.check_extra_text(node)?;
    let Some(version) = de.required_str(node, "version")? else {
        return Ok(None);
    };

    let backend = de.backend();
    let policy = de.policy();
    let mut header: Option<Header> = None;
    let mut header_seen = false;
    let mut body: Option<Vec<Tu>> = None;

    for child in backend.children(node, None) {
        match backend.tag(&child).as_str() {
            "header" => {
                if header_seen
                    && !de.replace_duplicate(&policy.multiple_headers, "tmx", "header")?
                {
                    continue;
                }
                header_seen = true;
                if let Some(parsed) = de.emit_as::<Header>(&child)? {
                    header = Some(parsed);
                }
            }
            "body" => {
                if body.is_some() && !de.replace_duplicate(&policy.multiple_bodies, "tmx", "body")? {
                    continue;
                }
                body = Some(units(de, &child)?);
            }
            other => de.invalid_child("tmx", other)?,
        }
    }

    let Some(header) = header else {
        de.missing_child(&policy.missing_header, "tmx", "header")?;
        return Ok(None);
    };
    let body = match body {
        Some(body) => body,
        None => {
            de.missing_child(&policy.missing_body, "tmx", "body")?;
            Vec::new()
        }
    };

    Ok(Some(Tmx { version, header, body }.into()))
}

/// `<body>` has no entity of its own: its units go straight into [`Tmx::body`]
fn units<B: XmlBackend>(de: &Deserializer<B>, body: &B::Node) -> DeserializationResult<Vec<Tu>> {
    let backend = de.backend();
    de.check_extra_text(body)?;
    let mut units = Vec::new();
    for child in backend.children(body, None) {
        let tag = backend.tag(&child);
        if tag != "tu" {
            de.invalid_child("body", &tag)?;
            continue;
        }
        if let Some(tu) = de.emit_as::<Tu>(&child)? {
            units.push(tu);
        }
    }
    Ok(units)
}

pub fn header<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "header")?;
    de.check_extra_text(node)?;
    let Some(creationtool) = de.required_str(node, "creationtool")? else {
        return Ok(None);
    };
    let Some(creationtoolversion) = de.required_str(node, "creationtoolversion")? else {
        return Ok(None);
    };
    let Some(segtype) = de.required_attr::<Segtype>(node, "segtype")? else {
        return Ok(None);
    };
    let Some(tmf) = de.required_str(node, "o-tmf")? else {
        return Ok(None);
    };
    let Some(adminlang) = de.required_str(node, "adminlang")? else {
        return Ok(None);
    };
    let Some(srclang) = de.required_str(node, "srclang")? else {
        return Ok(None);
    };
    let Some(datatype) = de.required_str(node, "datatype")? else {
        return Ok(None);
    };

    let mut header = Header {
        creationtool,
        creationtoolversion,
        segtype,
        tmf,
        adminlang,
        srclang,
        datatype,
        encoding: de.optional_str(node, "o-encoding"),
        creationdate: de.optional_attr(node, "creationdate")?,
        creationid: de.optional_str(node, "creationid"),
        changedate: de.optional_attr(node, "changedate")?,
        changeid: de.optional_str(node, "changeid"),
        notes: Vec::new(),
        props: Vec::new(),
    };

    let backend = de.backend();
    for child in backend.children(node, None) {
        match backend.tag(&child).as_str() {
            "note" => header.notes.extend(de.emit_as::<Note>(&child)?),
            "prop" => header.props.extend(de.emit_as::<Prop>(&child)?),
            other => de.invalid_child("header", other)?,
        }
    }
    Ok(Some(header.into()))
}

// ============================================================================
// TRANSLATION UNITS
// ============================================================================

pub fn tu<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "tu")?;
    de.check_extra_text(node)?;

    let mut tu = Tu {
        tuid: de.optional_str(node, "tuid"),
        encoding: de.optional_str(node, "o-encoding"),
        datatype: de.optional_str(node, "datatype"),
        usagecount: de.optional_attr(node, "usagecount")?,
        lastusagedate: de.optional_attr(node, "lastusagedate")?,
        creationtool: de.optional_str(node, "creationtool"),
        creationtoolversion: de.optional_str(node, "creationtoolversion"),
        creationdate: de.optional_attr(node, "creationdate")?,
        creationid: de.optional_str(node, "creationid"),
        changedate: de.optional_attr(node, "changedate")?,
        changeid: de.optional_str(node, "changeid"),
        segtype: de.optional_attr(node, "segtype")?,
        tmf: de.optional_str(node, "o-tmf"),
        srclang: de.optional_str(node, "srclang"),
        notes: Vec::new(),
        props: Vec::new(),
        variants: Vec::new(),
    };

    let backend = de.backend();
    for child in backend.children(node, None) {
        match backend.tag(&child).as_str() {
            "note" => tu.notes.extend(de.emit_as::<Note>(&child)?),
            "prop" => tu.props.extend(de.emit_as::<Prop>(&child)?),
            "tuv" => tu.variants.extend(de.emit_as::<Tuv>(&child)?),
            other => de.invalid_child("tu", other)?,
        }
    }
    Ok(Some(tu.into()))
}

pub fn tuv<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "tuv")?;
    de.check_extra_text(node)?;
    let Some(lang) = de.required_str(node, "xml:lang")? else {
        return Ok(None);
    };

    let mut tuv = Tuv {
        lang,
        encoding: de.optional_str(node, "o-encoding"),
        datatype: de.optional_str(node, "datatype"),
        usagecount: de.optional_attr(node, "usagecount")?,
        lastusagedate: de.optional_attr(node, "lastusagedate")?,
        creationtool: de.optional_str(node, "creationtool"),
        creationtoolversion: de.optional_str(node, "creationtoolversion"),
        creationdate: de.optional_attr(node, "creationdate")?,
        creationid: de.optional_str(node, "creationid"),
        changedate: de.optional_attr(node, "changedate")?,
        changeid: de.optional_str(node, "changeid"),
        tmf: de.optional_str(node, "o-tmf"),
        notes: Vec::new(),
        props: Vec::new(),
        content: Vec::new(),
    };

    let backend = de.backend();
    let policy = de.policy();
    let mut seg_seen = false;
    for child in backend.children(node, None) {
        match backend.tag(&child).as_str() {
            "note" => tuv.notes.extend(de.emit_as::<Note>(&child)?),
            "prop" => tuv.props.extend(de.emit_as::<Prop>(&child)?),
            "seg" => {
                if seg_seen && !de.replace_duplicate(&policy.multiple_seg, "tuv", "seg")? {
                    continue;
                }
                seg_seen = true;
                tuv.content = deserialize_content::<B, SegmentPart>(de, &child)?;
            }
            other => de.invalid_child("tuv", other)?,
        }
    }
    if !seg_seen {
        de.missing_child(&policy.missing_seg, "tuv", "seg")?;
    }
    Ok(Some(tuv.into()))
}

// ============================================================================
// ANNOTATIONS
// ============================================================================

pub fn note<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "note")?;
    let lang = de.optional_str(node, "xml:lang");
    let encoding = de.optional_str(node, "o-encoding");
    let text = de.required_text(node)?;
    Ok(Some(Note { text, lang, encoding }.into()))
}

pub fn prop<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "prop")?;
    let Some(kind) = de.required_str(node, "type")? else {
        return Ok(None);
    };
    let lang = de.optional_str(node, "xml:lang");
    let encoding = de.optional_str(node, "o-encoding");
    let text = de.required_text(node)?;
    Ok(Some(
        Prop {
            text,
            kind,
            lang,
            encoding,
        }
        .into(),
    ))
}

// ============================================================================
// INLINE MARKUP
// ============================================================================

pub fn bpt<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "bpt")?;
    let Some(i) = de.required_attr::<u32>(node, "i")? else {
        return Ok(None);
    };
    Ok(Some(
        Bpt {
            i,
            x: de.optional_attr(node, "x")?,
            kind: de.optional_str(node, "type"),
            content: deserialize_content::<B, CodePart>(de, node)?,
        }
        .into(),
    ))
}

pub fn ept<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "ept")?;
    let Some(i) = de.required_attr::<u32>(node, "i")? else {
        return Ok(None);
    };
    Ok(Some(
        Ept {
            i,
            content: deserialize_content::<B, CodePart>(de, node)?,
        }
        .into(),
    ))
}

pub fn it<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "it")?;
    let Some(pos) = de.required_attr::<Pos>(node, "pos")? else {
        return Ok(None);
    };
    Ok(Some(
        It {
            pos,
            x: de.optional_attr(node, "x")?,
            kind: de.optional_str(node, "type"),
            content: deserialize_content::<B, CodePart>(de, node)?,
        }
        .into(),
    ))
}

pub fn ph<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "ph")?;
    Ok(Some(
        Ph {
            x: de.optional_attr(node, "x")?,
            kind: de.optional_str(node, "type"),
            assoc: de.optional_attr(node, "assoc")?,
            content: deserialize_content::<B, CodePart>(de, node)?,
        }
        .into(),
    ))
}

pub fn hi<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "hi")?;
    Ok(Some(
        Hi {
            x: de.optional_attr(node, "x")?,
            kind: de.optional_str(node, "type"),
            content: deserialize_content::<B, SegmentPart>(de, node)?,
        }
        .into(),
    ))
}

pub fn sub<B: XmlBackend>(de: &Deserializer<B>, node: &B::Node) -> HandlerResult {
    de.check_tag(node, "sub")?;
    Ok(Some(
        Sub {
            datatype: de.optional_str(node, "datatype"),
            kind: de.optional_str(node, "type"),
            content: deserialize_content::<B, SegmentPart>(de, node)?,
        }
        .into(),
    ))
}
