//! Load / save entry points
//!
//! ```no_run
//! use tmx_codec::api::{self, Loader};
//! use tmx_codec::stream::TagFilter;
//!
//! let tmx = api::load("memory.tmx")?;
//! api::save(&tmx, "copy.tmx")?;
//!
//! for unit in Loader::new().stream("memory.tmx", &TagFilter::only("tu"))? {
//!     println!("{:?}", unit?);
//! }
//! # Ok::<(), tmx_codec::Error>(())
//! ```
//!
//! Paths are checked before any backend sees them: a missing file is
//! [`Error::NotFound`], a directory is [`Error::IsADirectory`].

use crate::backend::encoding::{declared_name, resolve_encoding, EncodedSink};
use crate::backend::writer::{write_declaration, write_node};
use crate::backend::{ArenaBackend, XmlBackend};
use crate::de::Deserializer;
use crate::errors::{BackendError, DeserializationError, Error, Result};
use crate::model::{Header, Tmx, Tu, TMX_VERSION};
use crate::policy::{DeserializationPolicy, SerializationPolicy};
use crate::ser::Serializer;
use crate::stream::{ElementStream, TagFilter};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads a whole TMX file with the default backend and a strict policy
pub fn load(path: impl AsRef<Path>) -> Result<Tmx> {
    Loader::new().load(path)
}

/// Writes a TMX file with the default backend and a strict policy
pub fn save(tmx: &Tmx, path: impl AsRef<Path>) -> Result<()> {
    Saver::new().save(tmx, path)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(Error::IsADirectory(path.to_path_buf()));
    }
    Ok(BufReader::new(File::open(path)?))
}

// ============================================================================
// LOADING
// ============================================================================

/// Configured reader; consumed by the load it performs
pub struct Loader<B: XmlBackend = ArenaBackend> {
    backend: B,
    policy: DeserializationPolicy,
}

impl Loader<ArenaBackend> {
    pub fn new() -> Self {
        Self::with_backend(ArenaBackend::new())
    }
}

impl Default for Loader<ArenaBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: XmlBackend> Loader<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            policy: DeserializationPolicy::default(),
        }
    }

    pub fn policy(mut self, policy: DeserializationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn load(self, path: impl AsRef<Path>) -> Result<Tmx> {
        let path = path.as_ref();
        log::debug!("loading {}", path.display());
        self.load_reader(open(path)?)
    }

    /// Parses the whole source, then deserializes its `<tmx>` root
    pub fn load_reader<R: BufRead>(self, source: R) -> Result<Tmx> {
        let root = self.backend.parse(source)?;
        let tag = self.backend.tag(&root);
        if tag != "tmx" {
            return Err(Error::NotTmx { found: tag });
        }

        let de = Deserializer::new(self.backend, self.policy);
        let element = de.deserialize(&root)?.ok_or(Error::Omitted { tag: tag.clone() })?;
        Tmx::try_from(element).map_err(|other| {
            Error::Deserialization(DeserializationError::UnexpectedElement {
                tag,
                expected: "tmx".to_string(),
                found: other.kind(),
            })
        })
    }

    /// Lazily yields the entities selected by `filter`
    pub fn stream(
        self,
        path: impl AsRef<Path>,
        filter: &TagFilter,
    ) -> Result<ElementStream<B, BufReader<File>>> {
        let path = path.as_ref();
        log::debug!("streaming {}", path.display());
        let source = open(path)?;
        Ok(self.stream_reader(source, filter))
    }

    pub fn stream_reader<R: BufRead>(self, source: R, filter: &TagFilter) -> ElementStream<B, R> {
        ElementStream::new(Deserializer::new(self.backend, self.policy), source, filter)
    }
}

// ============================================================================
// SAVING
// ============================================================================

/// Configured writer; consumed by the save it performs
pub struct Saver<B: XmlBackend = ArenaBackend> {
    backend: B,
    policy: SerializationPolicy,
    encoding: String,
}

impl Saver<ArenaBackend> {
    pub fn new() -> Self {
        Self::with_backend(ArenaBackend::new())
    }
}

impl Default for Saver<ArenaBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: XmlBackend> Saver<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            policy: SerializationPolicy::default(),
            encoding: "utf-8".to_string(),
        }
    }

    pub fn policy(mut self, policy: SerializationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Writes `tmx` to `path`, creating missing parent directories
    ///
    /// The document goes to a temporary file next to `path`, which replaces
    /// `path` only once it is complete. A failed save leaves `path` as it was.
    pub fn save(self, tmx: &Tmx, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(Error::IsADirectory(path.to_path_buf()));
        }
        let (ser, root, encoding) = self.serialize(tmx)?;

        let dir = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        log::debug!("saving {} unit(s) to {}", tmx.body.len(), path.display());

        let mut staged = NamedTempFile::new_in(dir)?;
        {
            let mut sink = BufWriter::new(staged.as_file_mut());
            ser.backend().write(&root, &mut sink, &encoding)?;
            sink.flush()?;
        }
        if let Ok(existing) = fs::metadata(path) {
            fs::set_permissions(staged.path(), existing.permissions())?;
        }
        staged.persist(path).map_err(|err| Error::Io(err.error))?;
        Ok(())
    }

    /// Serializes `tmx` and writes it, declaration included, to `sink`
    pub fn write<W: Write>(self, tmx: &Tmx, sink: W) -> Result<()> {
        let (ser, root, encoding) = self.serialize(tmx)?;
        ser.backend().write(&root, sink, &encoding)?;
        Ok(())
    }

    /// Builds the whole tree before anything is written
    fn serialize(self, tmx: &Tmx) -> Result<(Serializer<B>, B::Node, String)> {
        resolve_encoding(&self.encoding)?;
        let ser = Serializer::new(self.backend, self.policy);
        let root = ser.serialize(tmx)?.ok_or(Error::Omitted {
            tag: "tmx".to_string(),
        })?;
        Ok((ser, root, self.encoding))
    }

    /// Starts an incremental document on `sink`; see [`UnitWriter`]
    pub fn unit_writer<W: Write>(self, sink: W, header: &Header) -> Result<UnitWriter<B, W>> {
        UnitWriter::start(Serializer::new(self.backend, self.policy), sink, &self.encoding, header)
    }
}

/// Incremental document writer
///
/// The header is written up front, then every unit is serialized, written
/// and released as it arrives, so the body never exists as a whole tree.
/// Nothing closes the document until [`UnitWriter::finish`].
pub struct UnitWriter<B: XmlBackend, W: Write> {
    ser: Serializer<B>,
    writer: Writer<EncodedSink<W>>,
    /// Detached parent each unit hangs from while it is written
    scratch: B::Node,
    written: usize,
    flush_every: usize,
}

impl<B: XmlBackend, W: Write> UnitWriter<B, W> {
    fn start(ser: Serializer<B>, sink: W, encoding: &str, header: &Header) -> Result<Self> {
        let encoding = resolve_encoding(encoding)?;
        let mut writer = Writer::new(EncodedSink::new(sink, encoding));
        write_declaration(&mut writer, declared_name(encoding))?;

        let mut root = BytesStart::new("tmx");
        root.push_attribute(("version", TMX_VERSION));
        write_event(&mut writer, Event::Start(root))?;

        let backend = ser.backend();
        let scratch = backend.make_node("tmx");
        if let Some(node) = ser.serialize(header)? {
            backend.append_child(&scratch, &node);
            write_node(backend, &node, &mut writer)?;
            backend.remove_child(&scratch, &node);
        }
        write_event(&mut writer, Event::Start(BytesStart::new("body")))?;

        Ok(Self {
            ser,
            writer,
            scratch,
            written: 0,
            flush_every: 0,
        })
    }

    /// Flushes the sink after every `n` units; 0 leaves flushing to `finish`
    pub fn flush_every(mut self, n: usize) -> Self {
        self.flush_every = n;
        self
    }

    /// Number of units written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write_unit(&mut self, tu: &Tu) -> Result<()> {
        let backend = self.ser.backend();
        let Some(node) = self.ser.serialize(tu)? else {
            return Ok(());
        };
        backend.append_child(&self.scratch, &node);
        let written = write_node(backend, &node, &mut self.writer);
        backend.remove_child(&self.scratch, &node);
        written?;

        self.written += 1;
        if self.flush_every > 0 && self.written % self.flush_every == 0 {
            self.writer.get_mut().flush()?;
        }
        Ok(())
    }

    pub fn write_units<'a>(&mut self, units: impl IntoIterator<Item = &'a Tu>) -> Result<()> {
        for tu in units {
            self.write_unit(tu)?;
        }
        Ok(())
    }

    /// Closes `<body>` and `<tmx>`, flushes and hands back the sink
    pub fn finish(mut self) -> Result<W> {
        write_event(&mut self.writer, Event::End(BytesEnd::new("body")))?;
        write_event(&mut self.writer, Event::End(BytesEnd::new("tmx")))?;
        self.ser.backend().clear(&self.scratch);
        let mut sink = self.writer.into_inner().finish()?;
        sink.flush()?;
        log::debug!("wrote {} unit(s) incrementally", self.written);
        Ok(sink)
    }
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(BackendError::from)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
