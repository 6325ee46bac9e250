//! Coverage Loading
//!
//! Reads the per-test coverage document and the failed-test list into the
//! in-memory inputs of the localization core.
//!
//! Coverage documents look like:
//!
//! ```xml
//! <coverage>
//!   <test>
//!     <name>FooTest.testBar</name>
//!     <covLines>Foo.java:12, Foo.java:13</covLines>
//!   </test>
//! </coverage>
//! ```
//!
//! Only position matters inside `<test>`: the first child element holds the
//! test name, the second holds the `", "`-separated covered lines. Text is
//! gathered from every depth below a child and its whitespace runs collapse
//! to single spaces, so wrapped or pretty-printed documents read the same.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use crate::error::CoverageError;
use crate::localization::{CoverageMatrix, FailedTests, LineId, TestId};

/// Separator between covered line identifiers.
pub const LINE_SEPARATOR: &str = ", ";

/// Collapse every whitespace run into a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a covered-lines list, dropping empty items.
///
/// Whitespace is normalized first, so a list wrapped across lines splits
/// the same as one written on a single line.
pub fn split_lines(text: &str) -> BTreeSet<LineId> {
    normalize_whitespace(text)
        .split(LINE_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accumulates one `<test>` element.
#[derive(Debug, Default)]
struct TestAccum {
    name: Option<TestId>,
    lines: BTreeSet<LineId>,
    children: usize,
}

/// Coverage XML state machine.
struct CoverageParser {
    matrix: CoverageMatrix,
    depth: usize,
    /// Depth of the open `<test>` element, if any
    test_depth: Option<usize>,
    accum: TestAccum,
    /// Index of the direct child of `<test>` currently being read
    current_child: Option<usize>,
    text: String,
    tests_seen: usize,
}

impl CoverageParser {
    fn new() -> Self {
        Self {
            matrix: CoverageMatrix::new(),
            depth: 0,
            test_depth: None,
            accum: TestAccum::default(),
            current_child: None,
            text: String::new(),
            tests_seen: 0,
        }
    }

    fn is_test(name: &[u8]) -> bool {
        name == b"test"
    }

    /// Inside a direct child of `<test>`, at any nesting depth.
    fn in_child(&self) -> bool {
        self.current_child.is_some() && matches!(self.test_depth, Some(d) if self.depth > d)
    }

    fn handle_start(&mut self, e: &BytesStart<'_>) {
        self.depth += 1;
        match self.test_depth {
            None if Self::is_test(e.name().as_ref()) => {
                self.test_depth = Some(self.depth);
                self.accum = TestAccum::default();
                self.tests_seen += 1;
            }
            Some(d) if self.depth == d + 1 => {
                self.current_child = Some(self.accum.children);
                self.accum.children += 1;
                self.text.clear();
            }
            _ => {}
        }
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) -> Result<(), CoverageError> {
        match self.test_depth {
            None if Self::is_test(e.name().as_ref()) => {
                self.tests_seen += 1;
                Err(CoverageError::MissingTestName {
                    position: self.tests_seen,
                })
            }
            Some(d) if self.depth == d => {
                // <covLines/> and friends: a child with no text
                let index = self.accum.children;
                self.accum.children += 1;
                self.finish_child(index, "");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_text(&mut self, e: &BytesText<'_>) -> Result<(), CoverageError> {
        if self.in_child() {
            let text = e
                .unescape()
                .map_err(|err| CoverageError::Xml(err.to_string()))?;
            self.text.push_str(&text);
        }
        Ok(())
    }

    fn handle_cdata(&mut self, raw: &[u8]) {
        if self.in_child() {
            self.text.push_str(&String::from_utf8_lossy(raw));
        }
    }

    fn handle_end(&mut self, _e: &BytesEnd<'_>) -> Result<(), CoverageError> {
        match self.test_depth {
            Some(d) if self.depth == d + 1 => {
                if let Some(index) = self.current_child.take() {
                    let text = std::mem::take(&mut self.text);
                    self.finish_child(index, &text);
                }
            }
            Some(d) if self.depth == d => {
                self.finish_test()?;
                self.test_depth = None;
            }
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn finish_child(&mut self, index: usize, text: &str) {
        match index {
            0 => {
                let name = normalize_whitespace(text);
                if !name.is_empty() {
                    self.accum.name = Some(name);
                }
            }
            1 => self.accum.lines = split_lines(text),
            _ => {}
        }
    }

    fn finish_test(&mut self) -> Result<(), CoverageError> {
        let finished = std::mem::take(&mut self.accum);
        let name = finished.name.ok_or(CoverageError::MissingTestName {
            position: self.tests_seen,
        })?;
        // A repeated test name merges its coverage.
        self.matrix.entry(name).or_default().extend(finished.lines);
        Ok(())
    }
}

/// Parse a coverage XML document into a coverage matrix.
pub fn parse_coverage_xml(xml: &str) -> Result<CoverageMatrix, CoverageError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = CoverageParser::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.handle_start(e),
            Ok(Event::Empty(ref e)) => parser.handle_empty(e)?,
            Ok(Event::Text(ref e)) => parser.handle_text(e)?,
            Ok(Event::CData(ref e)) => parser.handle_cdata(e),
            Ok(Event::End(ref e)) => parser.handle_end(e)?,
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(CoverageError::Xml(format!(
                    "{} at byte {}",
                    err,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if parser.depth != 0 {
        return Err(CoverageError::Xml(
            "unexpected end of document: unclosed element".to_string(),
        ));
    }

    debug!(
        "Parsed {} test elements into {} coverage entries",
        parser.tests_seen,
        parser.matrix.len()
    );
    Ok(parser.matrix)
}

/// Parse a failed-test list: one test per line, `#` comments and blanks ignored.
pub fn parse_failed_tests(content: &str) -> FailedTests {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load a coverage matrix from an XML file.
pub fn load_coverage(path: &Path) -> anyhow::Result<CoverageMatrix> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read coverage file {}", path.display()))?;
    let matrix = parse_coverage_xml(&content)
        .with_context(|| format!("Failed to parse coverage file {}", path.display()))?;
    info!("Loaded coverage for {} tests from {:?}", matrix.len(), path);
    Ok(matrix)
}

/// Load the failed-test list from a text file.
pub fn load_failed_tests(path: &Path) -> anyhow::Result<FailedTests> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read failed-tests file {}", path.display()))?;
    let failed = parse_failed_tests(&content);
    info!("Loaded {} failed tests from {:?}", failed.len(), path);
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<coverage>
  <test>
    <name>t1</name>
    <covLines>l1, l2</covLines>
  </test>
  <test>
    <name>t2</name>
    <covLines>l1</covLines>
  </test>
  <test>
    <name>t3</name>
    <covLines>l2</covLines>
  </test>
</coverage>
"#;

    fn lines(items: &[&str]) -> BTreeSet<LineId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_coverage_basic() {
        let matrix = parse_coverage_xml(SAMPLE).unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix["t1"], lines(&["l1", "l2"]));
        assert_eq!(matrix["t2"], lines(&["l1"]));
        assert_eq!(matrix["t3"], lines(&["l2"]));
    }

    #[test]
    fn test_parse_coverage_wrapped_line_list() {
        let xml = "<c><test><name>t1</name><covLines>l1,\n      l2</covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix["t1"], lines(&["l1", "l2"]));
    }

    #[test]
    fn test_parse_coverage_nested_name_text() {
        let xml = "<c><test><name><b>t1</b></name><covLines>a, <i>b</i></covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix["t1"], lines(&["a", "b"]));
    }

    #[test]
    fn test_parse_coverage_name_whitespace_collapsed() {
        let xml = "<c><test><name>\n  Foo   Test\n</name><covLines>x</covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert!(matrix.contains_key("Foo Test"));
    }

    #[test]
    fn test_parse_coverage_child_names_ignored() {
        let xml = "<root><test><id>a</id><hits>x, y</hits></test></root>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix["a"], lines(&["x", "y"]));
    }

    #[test]
    fn test_parse_coverage_empty_lines() {
        let xml = "<c><test><name>t1</name><covLines></covLines></test>\
                   <test><name>t2</name><covLines/></test>\
                   <test><name>t3</name></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix.len(), 3);
        assert!(matrix.values().all(BTreeSet::is_empty));
    }

    #[test]
    fn test_parse_coverage_entities_unescaped() {
        let xml = "<c><test><name>A&amp;B</name><covLines>x&lt;1&gt;, y</covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix["A&B"], lines(&["x<1>", "y"]));
    }

    #[test]
    fn test_parse_coverage_cdata() {
        let xml = "<c><test><name><![CDATA[t<1>]]></name><covLines>a</covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix["t<1>"], lines(&["a"]));
    }

    #[test]
    fn test_parse_coverage_repeated_test_merges() {
        let xml = "<c><test><name>t</name><covLines>a</covLines></test>\
                   <test><name>t</name><covLines>b</covLines></test></c>";
        let matrix = parse_coverage_xml(xml).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix["t"], lines(&["a", "b"]));
    }

    #[test]
    fn test_parse_coverage_missing_name() {
        let xml = "<c><test><name>ok</name><l>a</l></test><test></test></c>";
        assert_eq!(
            parse_coverage_xml(xml).unwrap_err(),
            CoverageError::MissingTestName { position: 2 }
        );
    }

    #[test]
    fn test_parse_coverage_self_closing_test() {
        let xml = "<c><test/></c>";
        assert_eq!(
            parse_coverage_xml(xml).unwrap_err(),
            CoverageError::MissingTestName { position: 1 }
        );
    }

    #[test]
    fn test_parse_coverage_mismatched_tags() {
        let xml = "<c><test><name>t1</wrong></test></c>";
        assert!(matches!(
            parse_coverage_xml(xml),
            Err(CoverageError::Xml(_))
        ));
    }

    #[test]
    fn test_parse_coverage_unclosed() {
        let xml = "<c><test><name>t1</name>";
        assert!(matches!(
            parse_coverage_xml(xml),
            Err(CoverageError::Xml(_))
        ));
    }

    #[test]
    fn test_parse_coverage_empty_document() {
        assert!(parse_coverage_xml("<coverage/>").unwrap().is_empty());
    }

    #[test]
    fn test_split_lines_trims_and_drops_empty() {
        assert_eq!(split_lines(" a,  b , "), lines(&["a", "b"]));
        assert_eq!(split_lines("a, b, , c"), lines(&["a", "b", "c"]));
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_parse_failed_tests() {
        let content = "# failing tests\nt1\n\n  t2  \n#t3\nt1\n";
        let failed = parse_failed_tests(content);
        let expected: FailedTests = ["t1", "t2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(failed, expected);
    }

    #[test]
    fn test_load_coverage_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.xml");
        std::fs::write(&path, SAMPLE).unwrap();

        let matrix = load_coverage(&path).unwrap();
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_load_coverage_missing_file() {
        let err = load_coverage(Path::new("/nonexistent/cov.xml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read coverage file"));
    }

    #[test]
    fn test_load_failed_tests_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.txt");
        std::fs::write(&path, "t1\nt3\n").unwrap();

        let failed = load_failed_tests(&path).unwrap();
        assert_eq!(failed.len(), 2);
        assert!(failed.contains("t3"));
    }
}
