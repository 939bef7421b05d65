//! Locating version strings inside file content

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Semantic version, optionally prefixed with `v`; group 1 is the version.
static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bv?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\b")
        .expect("semver pattern is valid")
});

/// A version occurrence and its byte range in the content
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub range: Range<usize>,
    pub value: String,
    /// 1-based line of the occurrence
    pub line: usize,
}

/// Compiled extraction rule
#[derive(Debug, Clone)]
pub(crate) struct Extractor {
    regex: Regex,
}

impl Extractor {
    /// Compile `pattern`, or use the semantic-version pattern when absent.
    pub fn new(pattern: Option<&str>) -> Result<Self, regex::Error> {
        let regex = match pattern {
            Some(p) => Regex::new(p)?,
            None => SEMVER_PATTERN.clone(),
        };
        Ok(Self { regex })
    }

    /// First occurrence, or every occurrence when `all` is set.
    ///
    /// The version is capture group 1 when the pattern has one, otherwise
    /// the whole match.
    pub fn find(&self, content: &str, all: bool) -> Vec<Occurrence> {
        let mut found = Vec::new();
        for caps in self.regex.captures_iter(content) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            if m.as_str().is_empty() {
                continue;
            }
            found.push(Occurrence {
                range: m.range(),
                value: m.as_str().to_string(),
                line: line_of(content, m.start()),
            });
            if !all {
                break;
            }
        }
        found
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Replace each range with `replacement`, leaving every other byte intact.
///
/// Ranges must not overlap.
pub(crate) fn splice(content: &str, ranges: &[Range<usize>], replacement: &str) -> String {
    let mut sorted: Vec<&Range<usize>> = ranges.iter().collect();
    sorted.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for range in sorted {
        out.push_str(&content[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&content[cursor..]);
    out
}
