//! Output options: resources, encodings, and the output format tag.
//!
//! Resource kinds are selected by explicit builder calls. Named input
//! resolution falls back from a filesystem path to a bundled resource, and
//! finally to an empty string resource; it never fails.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use encoding_rs::{Encoding, UTF_8};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::config::{Config, INPUT_ENCODING_KEY, OUTPUT_ENCODING_KEY};
use crate::error::{Result, SchemaScanError};
use crate::snapshot::SNAPSHOT_ENTRY;

/// Output format tag; defaults to plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Resources bundled into the binary, addressable by name like files
const BUNDLED_RESOURCES: [(&str, &str); 2] = [
    (
        "information_schema.sequences.sql",
        include_str!("queries/information_schema.sequences.sql"),
    ),
    (
        "information_schema.synonyms.sql",
        include_str!("queries/information_schema.synonyms.sql"),
    ),
];

fn bundled_resource(name: &str) -> Option<&'static str> {
    BUNDLED_RESOURCES
        .iter()
        .find(|(resource_name, _)| *resource_name == name)
        .map(|(_, content)| *content)
}

fn resource_error(message: String, source: std::io::Error) -> SchemaScanError {
    SchemaScanError::OutputResource {
        message,
        source: Some(source),
    }
}

/// Where input text comes from
#[derive(Debug, Clone)]
pub enum InputResource {
    File(PathBuf),
    Bundled { name: String, content: &'static str },
    Text(String),
    /// A snapshot-style ZIP archive; reads the fixed catalog entry
    CompressedFile(PathBuf),
}

impl InputResource {
    /// Resolves a name to an existing file, then a bundled resource, then an
    /// empty string resource. Never errors.
    pub fn from_name(name: &str) -> Self {
        let path = Path::new(name);
        if path.is_file() {
            return InputResource::File(path.to_path_buf());
        }
        if let Some(content) = bundled_resource(name) {
            return InputResource::Bundled {
                name: name.to_string(),
                content,
            };
        }
        InputResource::Text(String::new())
    }

    pub fn read_to_string(&self, encoding: &'static Encoding) -> Result<String> {
        match self {
            InputResource::File(path) => {
                let bytes = std::fs::read(path).map_err(|err| {
                    resource_error(format!("cannot read input file {}", path.display()), err)
                })?;
                Ok(encoding.decode(&bytes).0.into_owned())
            }
            InputResource::Bundled { content, .. } => Ok((*content).to_string()),
            InputResource::Text(text) => Ok(text.clone()),
            InputResource::CompressedFile(path) => {
                let file = File::open(path).map_err(|err| {
                    resource_error(format!("cannot open compressed input {}", path.display()), err)
                })?;
                let mut archive = ZipArchive::new(file)?;
                let mut entry = archive.by_name(SNAPSHOT_ENTRY)?;
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes).map_err(|err| {
                    resource_error(format!("cannot read compressed input {}", path.display()), err)
                })?;
                Ok(encoding.decode(&bytes).0.into_owned())
            }
        }
    }
}

/// Where output bytes go
#[derive(Debug, Clone)]
pub enum OutputResource {
    File(PathBuf),
    Console,
    /// Shared in-memory buffer the caller can inspect afterwards
    Buffer(Arc<Mutex<Vec<u8>>>),
    /// A single-entry compressed archive
    CompressedFile(PathBuf),
}

impl OutputResource {
    /// An in-memory resource plus the shared handle to read it back.
    pub fn buffer() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let handle = Arc::new(Mutex::new(Vec::new()));
        (OutputResource::Buffer(Arc::clone(&handle)), handle)
    }

    pub fn write_all(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputResource::File(path) => std::fs::write(path, bytes).map_err(|err| {
                resource_error(format!("cannot write output file {}", path.display()), err)
            }),
            OutputResource::Console => std::io::stdout()
                .write_all(bytes)
                .map_err(|err| resource_error(String::from("cannot write to console"), err)),
            OutputResource::Buffer(handle) => {
                let mut buffer = handle.lock().map_err(|_| SchemaScanError::OutputResource {
                    message: String::from("output buffer lock poisoned"),
                    source: None,
                })?;
                buffer.extend_from_slice(bytes);
                Ok(())
            }
            OutputResource::CompressedFile(path) => {
                let file = File::create(path).map_err(|err| {
                    resource_error(
                        format!("cannot create compressed output {}", path.display()),
                        err,
                    )
                })?;
                let mut zip = ZipWriter::new(file);
                let options = SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated);
                zip.start_file(SNAPSHOT_ENTRY, options)?;
                zip.write_all(bytes).map_err(|err| {
                    resource_error(
                        format!("cannot write compressed output {}", path.display()),
                        err,
                    )
                })?;
                zip.finish()?;
                Ok(())
            }
        }
    }
}

/// One input resource, one output resource, their encodings, and the output
/// format tag
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub input_resource: InputResource,
    pub output_resource: OutputResource,
    pub input_encoding: &'static Encoding,
    pub output_encoding: &'static Encoding,
    pub output_format: OutputFormat,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            input_resource: InputResource::Text(String::new()),
            output_resource: OutputResource::Console,
            input_encoding: UTF_8,
            output_encoding: UTF_8,
            output_format: OutputFormat::Text,
        }
    }
}

impl OutputOptions {
    /// Encodings from configuration; blank or absent values mean UTF-8.
    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_input_encoding(&config.get_string(INPUT_ENCODING_KEY, "utf-8"))
            .with_output_encoding(&config.get_string(OUTPUT_ENCODING_KEY, "utf-8"))
    }

    pub fn with_input_resource(mut self, input_resource: InputResource) -> Self {
        self.input_resource = input_resource;
        self
    }

    pub fn with_output_resource(mut self, output_resource: OutputResource) -> Self {
        self.output_resource = output_resource;
        self
    }

    pub fn with_output_file(self, path: &Path) -> Self {
        self.with_output_resource(OutputResource::File(path.to_path_buf()))
    }

    pub fn with_input_encoding(mut self, label: &str) -> Self {
        self.input_encoding = encoding_for_label(label);
        self
    }

    pub fn with_output_encoding(mut self, label: &str) -> Self {
        self.output_encoding = encoding_for_label(label);
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Encodes and writes text through the output resource.
    pub fn write_string(&self, text: &str) -> Result<()> {
        let (bytes, _, _) = self.output_encoding.encode(text);
        self.output_resource.write_all(&bytes)
    }

    /// Reads and decodes the input resource.
    pub fn read_input(&self) -> Result<String> {
        self.input_resource.read_to_string(self.input_encoding)
    }
}

fn encoding_for_label(label: &str) -> &'static Encoding {
    if label.trim().is_empty() {
        return UTF_8;
    }
    Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8)
}
