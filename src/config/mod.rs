//! Codec configuration files
//!
//! One file carries both policies, the output encoding and the backend to
//! build readers and writers on. Every field is optional:
//!
//! ```yaml
//! backend: dom
//! encoding: utf-8
//! deserialization:
//!   missing_text: { behavior: empty, log_level: WARN }
//! serialization:
//!   invalid_attribute_value: { behavior: ignore, log_level: INFO }
//! ```

use crate::api::{Loader, Saver};
use crate::backend::{ArenaBackend, DomBackend};
use crate::errors::{Error, Result};
use crate::model::{Tmx, TmxElement};
use crate::policy::{DeserializationPolicy, SerializationPolicy};
use crate::stream::{ElementStream, TagFilter};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::iter::FusedIterator;
use std::path::Path;

/// Tree implementation a configuration asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Arena,
    Dom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub deserialization: DeserializationPolicy,
    pub serialization: SerializationPolicy,
    pub encoding: String,
    pub backend: BackendKind,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            deserialization: DeserializationPolicy::default(),
            serialization: SerializationPolicy::default(),
            encoding: "utf-8".to_string(),
            backend: BackendKind::default(),
        }
    }
}

impl CodecConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a `.json` file as JSON and anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(Error::IsADirectory(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    // Typed builders; these ignore `backend`

    pub fn loader(&self) -> Loader<ArenaBackend> {
        Loader::new().policy(self.deserialization.clone())
    }

    pub fn saver(&self) -> Saver<ArenaBackend> {
        Saver::new()
            .policy(self.serialization.clone())
            .encoding(self.encoding.clone())
    }

    pub fn dom_loader(&self) -> Loader<DomBackend> {
        Loader::with_backend(DomBackend::new()).policy(self.deserialization.clone())
    }

    pub fn dom_saver(&self) -> Saver<DomBackend> {
        Saver::with_backend(DomBackend::new())
            .policy(self.serialization.clone())
            .encoding(self.encoding.clone())
    }

    // Entry points that build on the configured `backend`

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Tmx> {
        match self.backend {
            BackendKind::Arena => self.loader().load(path),
            BackendKind::Dom => self.dom_loader().load(path),
        }
    }

    pub fn load_reader<R: BufRead>(&self, source: R) -> Result<Tmx> {
        match self.backend {
            BackendKind::Arena => self.loader().load_reader(source),
            BackendKind::Dom => self.dom_loader().load_reader(source),
        }
    }

    pub fn save(&self, tmx: &Tmx, path: impl AsRef<Path>) -> Result<()> {
        match self.backend {
            BackendKind::Arena => self.saver().save(tmx, path),
            BackendKind::Dom => self.dom_saver().save(tmx, path),
        }
    }

    pub fn write<W: Write>(&self, tmx: &Tmx, sink: W) -> Result<()> {
        match self.backend {
            BackendKind::Arena => self.saver().write(tmx, sink),
            BackendKind::Dom => self.dom_saver().write(tmx, sink),
        }
    }

    pub fn stream(
        &self,
        path: impl AsRef<Path>,
        filter: &TagFilter,
    ) -> Result<ConfiguredStream<BufReader<File>>> {
        Ok(match self.backend {
            BackendKind::Arena => ConfiguredStream::Arena(self.loader().stream(path, filter)?),
            BackendKind::Dom => ConfiguredStream::Dom(self.dom_loader().stream(path, filter)?),
        })
    }

    pub fn stream_reader<R: BufRead>(&self, source: R, filter: &TagFilter) -> ConfiguredStream<R> {
        match self.backend {
            BackendKind::Arena => ConfiguredStream::Arena(self.loader().stream_reader(source, filter)),
            BackendKind::Dom => ConfiguredStream::Dom(self.dom_loader().stream_reader(source, filter)),
        }
    }
}

/// [`ElementStream`] over whichever backend a [`CodecConfig`] named
pub enum ConfiguredStream<R> {
    Arena(ElementStream<ArenaBackend, R>),
    Dom(ElementStream<DomBackend, R>),
}

impl<R> ConfiguredStream<R> {
    pub fn backend(&self) -> BackendKind {
        match self {
            ConfiguredStream::Arena(_) => BackendKind::Arena,
            ConfiguredStream::Dom(_) => BackendKind::Dom,
        }
    }
}

impl<R: BufRead> Iterator for ConfiguredStream<R> {
    type Item = Result<TmxElement>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ConfiguredStream::Arena(stream) => stream.next(),
            ConfiguredStream::Dom(stream) => stream.next(),
        }
    }
}

impl<R: BufRead> FusedIterator for ConfiguredStream<R> {}
