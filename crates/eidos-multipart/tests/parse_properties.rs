//! Behavioral properties of the multipart parser.

use std::path::{Path, PathBuf};

use eidos_multipart::{
    FormNode, MultipartParser, ParseResult, ParserConfig, UploadErrorCode, UploadScope,
};
use proptest::prelude::*;

const BOUNDARY: &str = "----EidosBoundary7MA4YWxk";

fn content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Builds a multipart body from `(name, filename, value)` parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, value) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn parser_in(dir: &Path) -> MultipartParser {
    MultipartParser::new(ParserConfig::new().temp_dir(dir))
}

fn leaf<'a>(result: &'a ParseResult, keys: &[&str]) -> Option<&'a str> {
    result
        .fields
        .get_path(keys)
        .and_then(FormNode::as_leaf)
        .map(String::as_str)
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn missing_boundary_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let parser = parser_in(dir.path());
    let body = multipart_body(&[("a", None, b"1"), ("f", Some("a.txt"), b"data")]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some("multipart/form-data"), &mut uploads);

    assert!(result.fields.is_empty());
    assert!(result.files.is_empty());
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn nested_fields_merge() {
    let parser = MultipartParser::default();
    let body = multipart_body(&[("user[name]", None, b"Alice"), ("user[age]", None, b"30")]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);

    assert_eq!(result.fields.len(), 1);
    assert_eq!(leaf(&result, &["user", "name"]), Some("Alice"));
    assert_eq!(leaf(&result, &["user", "age"]), Some("30"));
}

#[test]
fn append_keeps_body_order() {
    let parser = MultipartParser::default();
    let body = multipart_body(&[("tags[]", None, b"x"), ("tags[]", None, b"y")]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);

    let tags = result.fields.get("tags").unwrap().values();
    assert_eq!(tags, vec!["x", "y"]);
}

#[test]
fn stored_file_matches_content() {
    let dir = tempfile::tempdir().unwrap();
    let parser = parser_in(dir.path());
    let content = b"\x00\x01binary\r\n--not-a-boundary\r\n\xff";
    let body = multipart_body(&[("doc", Some("a.txt"), content)]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);

    let doc = result.file("doc").unwrap();
    assert_eq!(doc.error, UploadErrorCode::Ok);
    assert_eq!(doc.original_name, "a.txt");
    assert_eq!(doc.size, content.len() as u64);
    let path = doc.path().unwrap();
    assert!(!path.as_os_str().is_empty());
    assert_eq!(std::fs::read(path).unwrap(), content);
}

#[test]
fn oversized_file_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let parser = MultipartParser::new(
        ParserConfig::new()
            .upload_max_filesize(10)
            .temp_dir(dir.path()),
    );
    let body = multipart_body(&[("big", Some("big.bin"), &[b'x'; 20])]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);

    let big = result.file("big").unwrap();
    assert_eq!(big.error, UploadErrorCode::SizeExceeded);
    assert!(big.storage_path.is_none());
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn temp_files_removed_when_later_part_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let parser = parser_in(dir.path());
    let mut body = multipart_body(&[("a", Some("a.txt"), b"first"), ("b", Some("b.txt"), b"second")]);
    // replace the closing delimiter with a part that has no blank line
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"c\"\r\nbroken\r\n--{BOUNDARY}--\r\n")
            .as_bytes(),
    );

    let stored: Vec<PathBuf> = {
        let mut uploads = UploadScope::new();
        let result = parser.parse(&body, Some(&content_type()), &mut uploads);

        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].index, 2);
        assert_eq!(uploads.len(), 2);
        uploads.paths().map(Path::to_path_buf).collect()
    };

    for path in &stored {
        assert!(!path.exists(), "{} was not removed", path.display());
    }
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn explicit_close_removes_files() {
    let dir = tempfile::tempdir().unwrap();
    let parser = parser_in(dir.path());
    let body = multipart_body(&[("a", Some("a.txt"), b"first")]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);
    assert!(result.file("a").unwrap().is_stored());

    uploads.close().unwrap();
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn native_shape_json() {
    let parser = MultipartParser::new(ParserConfig::new().upload_max_filesize(1));
    let body = multipart_body(&[("title", None, b"Hi"), ("doc", Some("a.txt"), b"toolarge")]);
    let mut uploads = UploadScope::new();

    let result = parser.parse(&body, Some(&content_type()), &mut uploads);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["fields"]["title"], "Hi");
    assert_eq!(json["files"]["doc"]["name"], "a.txt");
    assert_eq!(json["files"]["doc"]["type"], "application/octet-stream");
    assert_eq!(json["files"]["doc"]["error"], 1);
    assert_eq!(json["files"]["doc"]["size"], 8);
    assert!(json["files"]["doc"]["tmp_name"].is_null());
}

// Clears storage paths so two parses can be compared.
fn without_paths(result: &ParseResult) -> serde_json::Value {
    let mut json = serde_json::to_value(result).unwrap();
    strip_tmp_names(&mut json);
    json
}

fn strip_tmp_names(value: &mut serde_json::Value) {
    if let Some(map) = value.as_object_mut() {
        if map.contains_key("tmp_name") {
            map.insert("tmp_name".to_string(), serde_json::Value::Null);
        }
        for child in map.values_mut() {
            strip_tmp_names(child);
        }
    }
}

proptest! {
    #[test]
    fn distinct_scalar_fields_round_trip(
        fields in prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", "[A-Za-z0-9 ,.!?]{0,32}", 1..12)
    ) {
        let parts: Vec<(&str, Option<&str>, &[u8])> = fields
            .iter()
            .map(|(name, value)| (name.as_str(), None, value.as_bytes()))
            .collect();
        let body = multipart_body(&parts);
        let parser = MultipartParser::default();
        let mut uploads = UploadScope::new();

        let result = parser.parse(&body, Some(&content_type()), &mut uploads);

        prop_assert_eq!(result.fields.len(), fields.len());
        prop_assert!(result.rejected.is_empty());
        for (name, value) in &fields {
            prop_assert_eq!(result.field(name), Some(value.as_str()));
        }
    }

    #[test]
    fn parsing_is_idempotent(
        values in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..6)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let parser = parser_in(dir.path());
        let names: Vec<String> = (0..values.len()).map(|i| format!("part[{i}]")).collect();
        let parts: Vec<(&str, Option<&str>, &[u8])> = names
            .iter()
            .zip(&values)
            .enumerate()
            .map(|(i, (name, value))| {
                let file_name = (i % 2 == 0).then_some("upload.bin");
                (name.as_str(), file_name, value.as_slice())
            })
            .collect();
        let body = multipart_body(&parts);

        let mut first_scope = UploadScope::new();
        let first = parser.parse(&body, Some(&content_type()), &mut first_scope);
        let mut second_scope = UploadScope::new();
        let second = parser.parse(&body, Some(&content_type()), &mut second_scope);

        prop_assert_eq!(without_paths(&first), without_paths(&second));
        prop_assert_eq!(first.rejected, second.rejected);
    }
}
