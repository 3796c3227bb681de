use super::*;
use crate::backend::{ArenaBackend, DomBackend};
use crate::errors::{DeserializationError, Error};
use crate::model::{Hi, Note, SegmentPart, Tu};
use crate::policy::{DeserializationPolicy, MissingHandlerBehavior, PolicyValue};
use log::Level;
use std::io::Cursor;

const DOC: &str = r#"<?xml version="1.0"?>
<tmx version="1.4">
  <header creationtool="t" creationtoolversion="1" segtype="sentence" o-tmf="f"
          adminlang="en" srclang="en" datatype="plain">
    <note>header note</note>
  </header>
  <body>
    <tu tuid="1">
      <note>first</note>
      <tuv xml:lang="en"><seg>a<hi type="x">b<hi>c</hi></hi>d</seg></tuv>
    </tu>
    <tu tuid="2">
      <tuv xml:lang="en"><seg><hi>e</hi></seg></tuv>
    </tu>
  </body>
</tmx>"#;

fn stream<'a>(xml: &'a str, filter: &TagFilter) -> ElementStream<ArenaBackend, Cursor<&'a [u8]>> {
    let de = Deserializer::new(ArenaBackend::new(), DeserializationPolicy::default());
    ElementStream::new(de, Cursor::new(xml.as_bytes()), filter)
}

fn kinds<B: XmlBackend, R: BufRead>(stream: ElementStream<B, R>) -> Vec<ElementKind> {
    stream.map(|item| item.unwrap().kind()).collect()
}

#[test]
fn test_default_mask() {
    let mask = TagFilter::all().mask();
    assert!(!mask.contains("tmx"));
    assert!(mask.contains("tu"));
    assert!(mask.contains("sub"));
    assert!(!mask.contains("body"));
    assert!(!mask.contains("seg"));
    assert_eq!(mask.len(), 11);
}

#[test]
fn test_exclude_mask() {
    let mask = TagFilter::excluding(["note", "prop"]).mask();
    assert!(!mask.contains("note"));
    assert!(!mask.contains("prop"));
    assert!(mask.contains("tuv"));
    assert!(!mask.contains("tmx"));
}

#[test]
fn test_allow_list_keeps_root_when_named() {
    assert!(TagFilter::any_of(["tmx", "tu"]).mask().contains("tmx"));
    assert_eq!(TagFilter::only("tu").mask(), TagSet::from("tu"));
}

#[test]
fn test_units_only() {
    let units: Vec<Tu> = stream(DOC, &TagFilter::only("tu"))
        .map(|item| Tu::try_from(item.unwrap()).unwrap())
        .collect();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].tuid.as_deref(), Some("1"));
    assert_eq!(units[0].notes, vec![Note::new("first")]);
    assert_eq!(units[1].variants[0].lang, "en");
}

#[test]
fn test_nested_hi_suppressed() {
    let his: Vec<Hi> = stream(DOC, &TagFilter::only("hi"))
        .map(|item| Hi::try_from(item.unwrap()).unwrap())
        .collect();

    assert_eq!(his.len(), 2);
    assert_eq!(his[0].kind.as_deref(), Some("x"));
    assert_eq!(his[0].content[0], SegmentPart::Text("b".to_string()));
    assert!(matches!(his[0].content[1], SegmentPart::Hi(_)));
    assert_eq!(his[1].content, vec![SegmentPart::from("e")]);
}

#[test]
fn test_outermost_match_wins() {
    // header and tu match first, so their notes and variants never surface alone
    assert_eq!(
        kinds(stream(DOC, &TagFilter::all())),
        vec![ElementKind::Header, ElementKind::Tu, ElementKind::Tu]
    );
    assert_eq!(
        kinds(stream(DOC, &TagFilter::excluding(["header", "tu"]))),
        vec![ElementKind::Note, ElementKind::Note, ElementKind::Tuv, ElementKind::Tuv]
    );
}

#[test]
fn test_whole_document_when_root_requested() {
    let items = kinds(stream(DOC, &TagFilter::only("tmx")));
    assert_eq!(items, vec![ElementKind::Tmx]);
}

#[test]
fn test_memory_released_as_units_complete() {
    let mut xml = String::from(r#"<tmx version="1.4"><body>"#);
    for i in 0..200 {
        xml.push_str(&format!(r#"<tu tuid="{}"><tuv xml:lang="en"><seg>s<ph/>t</seg></tuv></tu>"#, i));
    }
    xml.push_str("</body></tmx>");

    let mut units = stream(&xml, &TagFilter::only("tu"));
    let mut peak = 0;
    let mut count = 0;
    while let Some(item) = units.next() {
        item.unwrap();
        count += 1;
        peak = peak.max(units.deserializer().backend().live_nodes());
    }
    assert_eq!(count, 200);
    // tmx and body stay open; each finished unit is gone before the next starts
    assert!(peak <= 2, "peak live nodes: {}", peak);
}

#[test]
fn test_partial_consumption() {
    let mut units = stream(DOC, &TagFilter::only("tu"));
    assert!(units.next().unwrap().is_ok());
    drop(units);
}

#[test]
fn test_error_fuses_stream() {
    let xml = r#"<tmx version="1.4"><body>
        <tu tuid="ok"/>
        <tu><prop>no type</prop></tu>
        <tu tuid="never"/>
    </body></tmx>"#;
    let mut units = stream(xml, &TagFilter::only("tu"));

    assert!(units.next().unwrap().is_ok());
    let err = units.next().unwrap().unwrap_err();
    assert!(matches!(
        err,
        Error::Deserialization(DeserializationError::MissingAttribute { ref attribute, .. }) if attribute == "type"
    ));
    assert!(units.next().is_none());
}

#[test]
fn test_malformed_xml_after_yielded_items() {
    let xml = r#"<tmx version="1.4"><body><tu tuid="a"/><tu></body></tmx>"#;
    let mut units = stream(xml, &TagFilter::only("tu"));
    assert!(units.next().unwrap().is_ok());
    assert!(matches!(units.next(), Some(Err(Error::Backend(_)))));
    assert!(units.next().is_none());
}

#[test]
fn test_wrapper_tags_route_to_missing_handler() {
    let mut policy = DeserializationPolicy::default();
    policy.missing_handler = PolicyValue::new(MissingHandlerBehavior::Ignore, Level::Debug);
    let de = Deserializer::new(ArenaBackend::new(), policy);
    let items: Vec<_> = ElementStream::new(de, Cursor::new(DOC.as_bytes()), &TagFilter::any_of(["body", "seg"]))
        .collect();
    assert!(items.is_empty());
}

#[test]
fn test_dom_backend_streams_too() {
    let de = Deserializer::new(DomBackend::new(), DeserializationPolicy::default());
    let units = ElementStream::new(de, Cursor::new(DOC.as_bytes()), &TagFilter::only("tuv"));
    assert_eq!(kinds(units), vec![ElementKind::Tuv, ElementKind::Tuv]);
}
