//! Authoring helpers behind the `festmap` binary.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::LatLngBounds;
use formats::{EventData, EventDataError, parse_booth_source, render_booth_page};
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoothPages {
    pub written: Vec<PathBuf>,
    /// Ids defined by more than one block; the last block's page is kept.
    pub duplicate_ids: Vec<String>,
}

/// Renders every booth block in `input` to `<out_dir>/<id>.html`.
pub fn generate_booth_pages(input: &Path, out_dir: &Path) -> Result<BoothPages, String> {
    let text = fs::read_to_string(input).map_err(|e| format!("read {input:?}: {e}"))?;
    let booths = parse_booth_source(&text);

    fs::create_dir_all(out_dir).map_err(|e| format!("create {out_dir:?}: {e}"))?;

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut pages = BoothPages::default();
    for booth in &booths {
        if !seen.insert(booth.id.as_str()) {
            pages.duplicate_ids.push(booth.id.clone());
        }
        let path = out_dir.join(booth.file_name());
        fs::write(&path, render_booth_page(booth)).map_err(|e| format!("write {path:?}: {e}"))?;
        pages.written.push(path);
    }
    Ok(pages)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub items: usize,
    pub stories: usize,
    pub rows: usize,
    /// Extent of the placeable items; `None` when there are none.
    pub bounds: Option<LatLngBounds>,
    /// Duplicate ids and dangling group members.
    pub findings: Vec<String>,
    /// Content files referenced by items but absent from the content directory.
    pub missing_content: Vec<String>,
}

impl ValidationSummary {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.missing_content.is_empty()
    }
}

/// Loads an event data document and reports what a visitor would trip over.
///
/// In strict mode any finding is an error.
pub fn validate_event_file(
    path: &Path,
    strict: bool,
    content_dir: Option<&Path>,
) -> Result<ValidationSummary, String> {
    let (data, report) = EventData::load(path).map_err(|e| format!("{path:?}: {e}"))?;
    if strict && !report.is_clean() {
        return Err(format!("{path:?}: {}", EventDataError::Invalid(report)));
    }

    let missing_content = match content_dir {
        Some(dir) => missing_content_files(&data, dir),
        None => Vec::new(),
    };
    if strict && !missing_content.is_empty() {
        return Err(format!(
            "missing content files in {dir:?}: {}",
            missing_content.join(", "),
            dir = content_dir.unwrap_or(Path::new("."))
        ));
    }

    Ok(ValidationSummary {
        items: data.len(),
        stories: data.stories().len(),
        rows: data.rows().len(),
        bounds: data.bounds(),
        findings: report.messages(),
        missing_content,
    })
}

fn missing_content_files(data: &EventData, dir: &Path) -> Vec<String> {
    data.content_files()
        .into_iter()
        .filter(|f| !dir.join(f).is_file())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"{
        "items": [
            {"id": "b1", "type": "booth", "name": "One", "lat": 37.2661, "lng": -122.0127,
             "description_file": "b1.html"},
            {"id": "b2", "type": "booth", "name": "Two", "lat": 37.2662, "lng": -122.0126,
             "description_file": "b2.html"}
        ],
        "stories": [{"id": "s", "name": "Tour", "itemIds": ["b1", "b9"]}]
    }"#;

    #[test]
    fn booth_pages_are_written_per_block() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("booths.txt");
        fs::write(
            &input,
            "<start>\nid: \"b1\"\nname: \"One\"\ndescription: hello\n<end>\n\
             <start>\nid: \"b2\"\nname: \"Two\"\ndescription: see www.x.org\n<end>\n\
             <start>\nid: \"b1\"\nname: \"One again\"\ndescription: bye\n<end>\n",
        )
        .expect("write input");

        let out = dir.path().join("pages");
        let pages = generate_booth_pages(&input, &out).expect("generate");
        assert_eq!(pages.written.len(), 3);
        assert_eq!(pages.duplicate_ids, vec!["b1".to_string()]);

        let b1 = fs::read_to_string(out.join("b1.html")).expect("b1");
        assert!(b1.contains("<title>b1 - One again</title>"));
        let b2 = fs::read_to_string(out.join("b2.html")).expect("b2");
        assert!(b2.contains(r#"<a href="https://www.x.org" target="_blank">"#));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = generate_booth_pages(&dir.path().join("nope.txt"), dir.path())
            .expect_err("missing");
        assert!(err.starts_with("read"));
    }

    #[test]
    fn validate_reports_dangling_and_missing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("event_data.json");
        fs::write(&doc, DOC).expect("write doc");
        fs::write(dir.path().join("b1.html"), "<p>one</p>").expect("write b1");

        let summary = validate_event_file(&doc, false, Some(dir.path())).expect("validate");
        assert_eq!(summary.items, 2);
        assert_eq!(summary.stories, 1);
        let bounds = summary.bounds.expect("bounds");
        assert_eq!(bounds.south_west.lat, 37.2661);
        assert_eq!(bounds.north_east.lng, -122.0126);
        assert_eq!(summary.findings.len(), 1);
        assert_eq!(summary.missing_content, vec!["b2.html".to_string()]);
        assert!(!summary.is_clean());
    }

    #[test]
    fn strict_validation_rejects_findings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("event_data.json");
        fs::write(&doc, DOC).expect("write doc");
        let err = validate_event_file(&doc, true, None).expect_err("strict");
        assert!(err.contains("b9"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc = dir.path().join("event_data.json");
        fs::write(&doc, "{\"items\": [{\"id\": 1}]}").expect("write doc");
        assert!(validate_event_file(&doc, false, None).is_err());
    }
}
