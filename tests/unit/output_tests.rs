//! Unit tests for output options, resources, and encodings

use std::io::Write as _;

use encoding_rs::{UTF_8, WINDOWS_1252};

use rust_schemascan::config::{Config, INPUT_ENCODING_KEY, OUTPUT_ENCODING_KEY};
use rust_schemascan::output::{InputResource, OutputFormat, OutputOptions, OutputResource};

#[test]
fn test_defaults_are_console_text_utf8() {
    let options = OutputOptions::default();
    assert_eq!(options.input_encoding, UTF_8);
    assert_eq!(options.output_encoding, UTF_8);
    assert_eq!(options.output_format, OutputFormat::Text);
    assert!(matches!(options.output_resource, OutputResource::Console));
    assert!(matches!(options.input_resource, InputResource::Text(ref text) if text.is_empty()));
}

#[test]
fn test_config_encodings_with_blank_values_fall_back_to_utf8() {
    let mut config = Config::new();
    config.set(INPUT_ENCODING_KEY, "  ");
    config.set(OUTPUT_ENCODING_KEY, "windows-1252");
    let options = OutputOptions::from_config(&config);
    assert_eq!(options.input_encoding, UTF_8);
    assert_eq!(options.output_encoding, WINDOWS_1252);
}

#[test]
fn test_unknown_encoding_label_falls_back_to_utf8() {
    let options = OutputOptions::default().with_output_encoding("no-such-charset");
    assert_eq!(options.output_encoding, UTF_8);
}

#[test]
fn test_format_parsing_defaults_to_text() {
    assert_eq!(OutputFormat::from_value("json"), OutputFormat::Json);
    assert_eq!(OutputFormat::from_value("JSON"), OutputFormat::Json);
    assert_eq!(OutputFormat::from_value("text"), OutputFormat::Text);
    assert_eq!(OutputFormat::from_value("unheard-of"), OutputFormat::Text);
}

#[test]
fn test_name_resolution_prefers_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("query.sql");
    std::fs::write(&path, "SELECT 1").unwrap();

    let resource = InputResource::from_name(path.to_str().unwrap());
    assert!(matches!(resource, InputResource::File(_)));
    assert_eq!(resource.read_to_string(UTF_8).unwrap(), "SELECT 1");
}

#[test]
fn test_name_resolution_falls_back_to_bundled_resources() {
    let resource = InputResource::from_name("information_schema.sequences.sql");
    assert!(matches!(resource, InputResource::Bundled { .. }));
    let content = resource.read_to_string(UTF_8).unwrap();
    assert!(content.contains("${schemas}"));
}

#[test]
fn test_name_resolution_never_fails() {
    let resource = InputResource::from_name("no/such/resource.sql");
    assert!(matches!(resource, InputResource::Text(ref text) if text.is_empty()));
    assert_eq!(resource.read_to_string(UTF_8).unwrap(), "");
}

#[test]
fn test_buffer_resource_captures_written_text() {
    let (resource, handle) = OutputResource::buffer();
    let options = OutputOptions::default().with_output_resource(resource);
    options.write_string("Schema: PUBLIC\n").unwrap();
    options.write_string("Schema: HR\n").unwrap();

    let bytes = handle.lock().unwrap().clone();
    assert_eq!(String::from_utf8(bytes).unwrap(), "Schema: PUBLIC\nSchema: HR\n");
}

#[test]
fn test_file_resource_writes_with_the_requested_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listing.txt");
    let options = OutputOptions::default()
        .with_output_file(&path)
        .with_output_encoding("windows-1252");
    options.write_string("caf\u{e9}").unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, b"caf\xe9");
}

#[test]
fn test_compressed_output_reads_back_through_compressed_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listing.zip");
    let options =
        OutputOptions::default().with_output_resource(OutputResource::CompressedFile(path.clone()));
    options.write_string("compressed listing").unwrap();

    let input = InputResource::CompressedFile(path);
    assert_eq!(input.read_to_string(UTF_8).unwrap(), "compressed listing");
}

#[test]
fn test_input_file_is_decoded_with_the_input_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sql");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"caf\xe9").unwrap();

    let options = OutputOptions::default()
        .with_input_resource(InputResource::File(path))
        .with_input_encoding("windows-1252");
    assert_eq!(options.read_input().unwrap(), "caf\u{e9}");
}
