use super::*;
use std::io::Cursor;

const MIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE tmx SYSTEM "tmx14.dtd">
<seg xml:lang="fr">Hello <bpt i="1">&lt;b&gt;</bpt>bold<ept i="1">&lt;/b&gt;</ept><!-- note --> &amp; <![CDATA[raw <text>]]><ph/></seg>"#;

fn parse_str<B: XmlBackend>(backend: &B, xml: &str) -> B::Node {
    backend.parse(Cursor::new(xml.as_bytes())).unwrap()
}

fn write_str<B: XmlBackend>(backend: &B, node: &B::Node) -> String {
    let mut out = Vec::new();
    backend.write(node, &mut out, "utf-8").unwrap();
    String::from_utf8(out).unwrap()
}

// ============================================================================
// GENERIC CONTRACT CHECKS
// ============================================================================

fn check_text_and_tails<B: XmlBackend>(backend: &B) {
    let seg = parse_str(backend, MIXED);
    assert_eq!(backend.tag(&seg), "seg");
    assert_eq!(backend.get_text(&seg).as_deref(), Some("Hello "));
    assert_eq!(backend.get_attribute(&seg, "xml:lang").as_deref(), Some("fr"));
    assert_eq!(
        backend
            .get_attribute(&seg, "{http://www.w3.org/XML/1998/namespace}lang")
            .as_deref(),
        Some("fr")
    );

    let children = backend.children(&seg, None);
    let tags: Vec<String> = children.iter().map(|c| backend.tag(c)).collect();
    assert_eq!(tags, vec!["bpt", "ept", "ph"]);

    assert_eq!(backend.get_text(&children[0]).as_deref(), Some("<b>"));
    assert_eq!(backend.get_tail(&children[0]).as_deref(), Some("bold"));
    // Comment dropped, CDATA merged into the tail verbatim
    assert_eq!(
        backend.get_tail(&children[1]).as_deref(),
        Some(" & raw <text>")
    );
    assert_eq!(backend.get_text(&children[2]), None);
}

fn check_filtered_children<B: XmlBackend>(backend: &B) {
    let seg = parse_str(backend, MIXED);
    let codes = backend.children(&seg, Some(&TagSet::from(["bpt", "ept"])));
    assert_eq!(codes.len(), 2);
    assert!(backend.children(&seg, Some(&TagSet::new())).is_empty());
}

fn check_build_and_write<B: XmlBackend>(backend: &B) {
    let prop = backend.make_node("prop");
    backend.set_attribute(&prop, "type", "x-domain");
    backend.set_attribute(&prop, "xml:lang", "en");
    backend.set_text(&prop, Some("legal & <finance>"));

    let empty = backend.make_node("note");
    let header = backend.make_node("header");
    backend.append_child(&header, &prop);
    backend.append_child(&header, &empty);
    backend.set_tail(&prop, Some("\n"));

    let xml = write_str(backend, &header);
    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <header><prop type=\"x-domain\" xml:lang=\"en\">legal &amp; &lt;finance&gt;</prop>\n<note/></header>"
    );
}

fn check_remove_and_clear<B: XmlBackend>(backend: &B) {
    let root = parse_str(backend, "<body><tu a=\"1\">x<tuv/></tu><tu/></body>");
    let units = backend.children(&root, None);
    backend.remove_child(&root, &units[0]);
    assert_eq!(backend.children(&root, None).len(), 1);

    backend.clear(&root);
    assert!(backend.children(&root, None).is_empty());
    assert!(backend.attributes(&root).is_empty());
    assert_eq!(backend.tag(&root), "body");
}

fn check_stream_events<B: XmlBackend>(backend: &B) {
    let mut cursor = backend.stream_parse(Cursor::new("<a><b/><c>t</c></a>".as_bytes()));
    let mut seen = Vec::new();
    while let Some(event) = cursor.next_event(backend).unwrap() {
        let tag = backend.tag(event.node());
        seen.push(match event {
            TreeEvent::Start(_) => format!("+{}", tag),
            TreeEvent::End(_) => format!("-{}", tag),
        });
    }
    assert_eq!(seen, vec!["+a", "+b", "-b", "+c", "-c", "-a"]);
}

fn check_truncated_input<B: XmlBackend>(backend: &B) {
    let err = backend
        .parse(Cursor::new("<tmx><body>".as_bytes()))
        .unwrap_err();
    assert!(
        matches!(err, BackendError::UnexpectedEof { .. } | BackendError::Dom(_)),
        "{:?}",
        err
    );
}

macro_rules! backend_contract {
    ($name:ident, $backend:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn test_text_and_tails() {
                check_text_and_tails(&$backend);
            }

            #[test]
            fn test_filtered_children() {
                check_filtered_children(&$backend);
            }

            #[test]
            fn test_build_and_write() {
                check_build_and_write(&$backend);
            }

            #[test]
            fn test_remove_and_clear() {
                check_remove_and_clear(&$backend);
            }

            #[test]
            fn test_stream_events() {
                check_stream_events(&$backend);
            }

            #[test]
            fn test_truncated_input() {
                check_truncated_input(&$backend);
            }
        }
    };
}

backend_contract!(arena, ArenaBackend::new());
backend_contract!(dom, DomBackend::new());

// ============================================================================
// BACKEND SPECIFICS
// ============================================================================

#[test]
fn test_arena_reuses_released_slots() {
    let backend = ArenaBackend::new();
    let root = backend.make_node("body");
    for _ in 0..100 {
        let tu = backend.make_node("tu");
        let tuv = backend.make_node("tuv");
        backend.append_child(&tu, &tuv);
        backend.append_child(&root, &tu);
        backend.remove_child(&root, &tu);
    }
    assert_eq!(backend.live_nodes(), 1);
}

#[test]
fn test_arena_append_moves_child() {
    let backend = ArenaBackend::new();
    let first = backend.make_node("a");
    let second = backend.make_node("b");
    let child = backend.make_node("c");
    backend.append_child(&first, &child);
    backend.append_child(&second, &child);
    assert!(backend.children(&first, None).is_empty());
    assert_eq!(backend.parent(&child), Some(second));
}

#[test]
fn test_dom_stores_clark_keys() {
    let backend = DomBackend::new();
    let node = backend.make_node("tuv");
    backend.set_attribute(&node, "xml:lang", "de");
    assert_eq!(
        backend.attributes(&node),
        vec![("xml:lang".to_string(), "de".to_string())]
    );
    assert_eq!(backend.get_attribute(&node, "lang"), None);
}

#[test]
fn test_unsupported_encoding_is_rejected() {
    let backend = ArenaBackend::new();
    let node = backend.make_node("tmx");
    let err = backend.write(&node, Vec::new(), "ebcdic-37").unwrap_err();
    assert!(matches!(err, BackendError::UnsupportedEncoding(label) if label == "ebcdic-37"));
}

#[test]
fn test_name_normalization() {
    assert_eq!(local_name("{urn:x}tu"), "tu");
    assert_eq!(local_name("t:tu"), "tu");
    assert_eq!(normalize_key(&format!("{{{}}}lang", XML_NAMESPACE)), "xml:lang");
    assert_eq!(clark_key("type"), "type");
    assert_eq!(resolve_encoding("UTF_8").unwrap(), encoding_rs::UTF_8);
}

#[test]
fn test_empty_document() {
    let err = ArenaBackend::new()
        .parse(Cursor::new("<?xml version=\"1.0\"?>".as_bytes()))
        .unwrap_err();
    assert!(matches!(err, BackendError::EmptyDocument));
}

// ============================================================================
// ENCODINGS
// ============================================================================

fn utf16(text: &str, big_endian: bool, bom: bool) -> Vec<u8> {
    let mut out = Vec::new();
    if bom {
        out.extend_from_slice(if big_endian { &[0xFE, 0xFF] } else { &[0xFF, 0xFE] });
    }
    for unit in text.encode_utf16() {
        out.extend_from_slice(&if big_endian { unit.to_be_bytes() } else { unit.to_le_bytes() });
    }
    out
}

const NOTE_16: &str = "<?xml version=\"1.0\" encoding=\"UTF-16\"?>\n<note xml:lang=\"ja\">日本語 &amp; 𝄞</note>";

fn check_utf16_input<B: XmlBackend>(backend: &B) {
    for (big_endian, bom) in [(false, true), (true, true), (false, false), (true, false)] {
        let node = backend.parse(Cursor::new(utf16(NOTE_16, big_endian, bom))).unwrap();
        assert_eq!(backend.tag(&node), "note");
        assert_eq!(backend.get_attribute(&node, "xml:lang").as_deref(), Some("ja"));
        assert_eq!(backend.get_text(&node).as_deref(), Some("日本語 & 𝄞"));
    }
}

#[test]
fn test_utf16_input() {
    check_utf16_input(&ArenaBackend::new());
    check_utf16_input(&DomBackend::new());
}

#[test]
fn test_declared_single_byte_input() {
    let mut bytes = b"<?xml version='1.0' encoding='ISO-8859-1'?><note>caf".to_vec();
    bytes.extend_from_slice(&[0xE9, 0xA0]);
    bytes.extend_from_slice(b"</note>");

    let arena = ArenaBackend::new();
    let node = arena.parse(Cursor::new(&bytes)).unwrap();
    assert_eq!(arena.get_text(&node).as_deref(), Some("café\u{a0}"));

    let dom = DomBackend::new();
    let node = dom.parse(Cursor::new(&bytes)).unwrap();
    assert_eq!(dom.get_text(&node).as_deref(), Some("café\u{a0}"));
}

#[test]
fn test_utf8_bom_is_skipped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("<note>ü</note>".as_bytes());
    let backend = ArenaBackend::new();
    let node = backend.parse(Cursor::new(bytes)).unwrap();
    assert_eq!(backend.get_text(&node).as_deref(), Some("ü"));
}

#[test]
fn test_decoding_across_small_reads() {
    let bytes = utf16("<seg>𝄞𝄞𝄞 abc</seg>", false, true);
    let backend = ArenaBackend::new();
    let node = backend
        .parse(std::io::BufReader::with_capacity(3, Cursor::new(bytes)))
        .unwrap();
    assert_eq!(backend.get_text(&node).as_deref(), Some("𝄞𝄞𝄞 abc"));
}

#[test]
fn test_utf16_output() {
    let backend = ArenaBackend::new();
    let node = backend.make_node("note");
    backend.set_text(&node, Some("Grüße 𝄞"));

    let mut out = Vec::new();
    backend.write(&node, &mut out, "utf-16").unwrap();
    assert_eq!(&out[..2], &[0xFF, 0xFE]);
    assert_eq!(
        out,
        utf16("<?xml version=\"1.0\" encoding=\"UTF-16\"?>\n<note>Grüße 𝄞</note>", false, true)
    );

    let reread = DomBackend::new().parse(Cursor::new(out)).unwrap();
    assert_eq!(DomBackend::new().get_text(&reread).as_deref(), Some("Grüße 𝄞"));
}

#[test]
fn test_single_byte_output_escapes_unmappable() {
    let backend = ArenaBackend::new();
    let node = backend.make_node("note");
    backend.set_attribute(&node, "xml:lang", "fr");
    backend.set_text(&node, Some("café 日"));

    let mut out = Vec::new();
    backend.write(&node, &mut out, "latin1").unwrap();
    let mut expected = b"<?xml version=\"1.0\" encoding=\"windows-1252\"?>\n<note xml:lang=\"fr\">caf".to_vec();
    expected.extend_from_slice(&[0xE9]);
    expected.extend_from_slice(b" &#26085;</note>");
    assert_eq!(out, expected);

    let reread = backend.parse(Cursor::new(out)).unwrap();
    assert_eq!(backend.get_text(&reread).as_deref(), Some("café 日"));
}

#[test]
fn test_encoding_detection() {
    assert_eq!(encoding::detect(b"<?xml version=\"1.0\"?><a/>"), (encoding_rs::UTF_8, 0));
    assert_eq!(
        encoding::detect(b"<?xml version=\"1.0\" encoding = \"Shift_JIS\"?>"),
        (encoding_rs::SHIFT_JIS, 0)
    );
    // ASCII-compatible bytes declaring UTF-16 are read as UTF-8
    assert_eq!(encoding::detect(b"<?xml version=\"1.0\" encoding=\"UTF-16\"?>"), (encoding_rs::UTF_8, 0));
    assert_eq!(encoding::detect(&[0xFE, 0xFF, 0x00, 0x3C]), (encoding_rs::UTF_16BE, 2));
    assert_eq!(encoding::declared_name(encoding_rs::UTF_16BE), "UTF-16");
}

#[test]
fn test_foreign_namespace_attributes_dropped() {
    let xml = r#"<tu xmlns:x="urn:x" x:flag="1" tuid="7" xml:lang="en"/>"#;
    let expected = vec![
        ("tuid".to_string(), "7".to_string()),
        ("xml:lang".to_string(), "en".to_string()),
    ];

    let arena = ArenaBackend::new();
    let node = parse_str(&arena, xml);
    assert_eq!(arena.attributes(&node), expected);

    let dom = DomBackend::new();
    let node = parse_str(&dom, xml);
    assert_eq!(dom.attributes(&node), expected);
    assert_eq!(write_str(&dom, &node), "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tu tuid=\"7\" xml:lang=\"en\"/>");

    dom.set_attribute(&node, "{urn:x}flag", "1");
    assert!(!write_str(&dom, &node).contains("urn:x"));
}

#[test]
fn test_decoded_source_reports_encoding() {
    use std::io::Read;

    let mut source = DecodedSource::new(Cursor::new(utf16("<a>ö</a>", true, true)));
    assert_eq!(source.encoding(), encoding_rs::UTF_8);
    let mut text = String::new();
    source.read_to_string(&mut text).unwrap();
    assert_eq!(text, "<a>ö</a>");
    assert_eq!(source.encoding(), encoding_rs::UTF_16BE);

    let mut sink = EncodedSink::new(Vec::new(), encoding_rs::WINDOWS_1252);
    assert_eq!(sink.encoding(), encoding_rs::WINDOWS_1252);
    std::io::Write::write_all(&mut sink, "ö".as_bytes()).unwrap();
    assert_eq!(sink.finish().unwrap(), vec![0xF6]);
}
