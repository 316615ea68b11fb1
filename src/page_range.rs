use anyhow::{anyhow, bail, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// A half-open `[start, end)` interval of zero-based page indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageSpan {
    pub fn new(start: u32, end: u32) -> Self {
        PageSpan { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page < self.end
    }

    /// Parse a span like "0-3" (end exclusive)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (start_str, end_str) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid page span (expected start-end): {}", s))?;

        // "-5" would otherwise slip through as an empty start
        if start_str.trim().is_empty() {
            bail!("Invalid page span: {}", s);
        }

        let start = parse_index(start_str)?;
        let end = parse_index(end_str)?;
        Ok(PageSpan { start, end })
    }
}

fn parse_index(s: &str) -> Result<u32> {
    let s = s.trim();
    s.parse::<u32>()
        .map_err(|_| anyhow!("Invalid page index: {}", s))
}

/// Ordered mapping of output index to the span of source pages it receives.
///
/// Output indices are consecutive, starting at `first_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRangeMap {
    first_index: u32,
    spans: Vec<PageSpan>,
}

impl Default for PageRangeMap {
    /// One output per page for the first five pages
    fn default() -> Self {
        PageRangeMap {
            first_index: 0,
            spans: (0..5).map(|n| PageSpan::new(n, n + 1)).collect(),
        }
    }
}

impl PageRangeMap {
    /// Parse a comma-separated mapping like "0-1,1-4,4-10".
    ///
    /// Entries may carry an explicit output index ("2:4-10"). Explicit
    /// indices must continue the sequence; unprefixed entries take the next
    /// index, starting from 0.
    pub fn parse(s: &str) -> Result<Self> {
        let mut first_index = None;
        let mut spans = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                bail!("Empty entry in page range mapping: {:?}", s);
            }

            let expected = first_index
                .map(|first: u32| {
                    first
                        .checked_add(spans.len() as u32)
                        .ok_or_else(|| anyhow!("Output index overflow after {}", first))
                })
                .transpose()?;
            let (index, span) = match part.split_once(':') {
                Some((index_str, span_str)) => {
                    (parse_index(index_str)?, PageSpan::parse(span_str)?)
                }
                None => (expected.unwrap_or(0), PageSpan::parse(part)?),
            };

            if let Some(expected) = expected {
                if index != expected {
                    bail!(
                        "Output indices must be consecutive: expected {}, found {}",
                        expected,
                        index
                    );
                }
            } else {
                first_index = Some(index);
            }

            spans.push(span);
        }

        Ok(PageRangeMap {
            first_index: first_index.unwrap_or(0),
            spans,
        })
    }

    /// Build a mapping from keyed entries, which must use consecutive indices
    pub fn from_entries(entries: BTreeMap<u32, PageSpan>) -> Result<Self> {
        let first_index = match entries.keys().next() {
            Some(&first) => first,
            None => bail!("Page range mapping is empty"),
        };

        let mut spans = Vec::with_capacity(entries.len());
        for (offset, (index, span)) in entries.into_iter().enumerate() {
            let expected = first_index + offset as u32;
            if index != expected {
                bail!(
                    "Output indices must be consecutive: expected {}, found {}",
                    expected,
                    index
                );
            }
            spans.push(span);
        }

        Ok(PageRangeMap { first_index, spans })
    }

    /// Parse a JSON object like `{"0": [0, 1], "1": [1, 2]}`
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: BTreeMap<u32, [u32; 2]> =
            serde_json::from_str(s).context("Invalid page range mapping JSON")?;
        Self::from_entries(
            raw.into_iter()
                .map(|(index, [start, end])| (index, PageSpan::new(start, end)))
                .collect(),
        )
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to parse mapping file: {}", path.display()))
    }

    pub fn first_index(&self) -> u32 {
        self.first_index
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Output index of the last entry
    pub fn last_index(&self) -> u32 {
        self.first_index + (self.spans.len() as u32).saturating_sub(1)
    }

    /// Iterate `(output_index, span)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (u32, PageSpan)> + '_ {
        self.spans
            .iter()
            .enumerate()
            .map(move |(offset, span)| (self.first_index + offset as u32, *span))
    }

    /// Check that the spans partition `[0, total_pages)` in order
    pub fn validate(&self, total_pages: u32) -> Result<()> {
        if self.is_empty() {
            bail!("Page range mapping is empty");
        }

        let mut expected_start = 0;
        for (index, span) in self.iter() {
            if span.start > span.end {
                bail!(
                    "Range for output {} is inverted: [{}, {})",
                    index,
                    span.start,
                    span.end
                );
            }
            if span.start > expected_start {
                bail!(
                    "Gap before output {}: pages {}..{} are not assigned",
                    index,
                    expected_start,
                    span.start
                );
            }
            if span.start < expected_start {
                bail!(
                    "Range for output {} overlaps the previous one: starts at {}, expected {}",
                    index,
                    span.start,
                    expected_start
                );
            }
            expected_start = span.end;
        }

        if expected_start != total_pages {
            bail!(
                "Page range mapping covers pages 0..{}, but the document has {} page(s)",
                expected_start,
                total_pages
            );
        }

        Ok(())
    }

    /// Output index whose span holds `page`.
    ///
    /// Binary search, so the mapping must already be validated.
    pub fn target_of(&self, page: u32) -> Option<u32> {
        let pos = self.spans.partition_point(|span| span.end <= page);
        self.spans
            .get(pos)
            .filter(|span| span.contains(page))
            .map(|_| self.first_index + pos as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_parse() {
        let span = PageSpan::parse("2-5").unwrap();
        assert_eq!(span, PageSpan::new(2, 5));
        assert_eq!(span.len(), 3);
        assert!(span.contains(2));
        assert!(!span.contains(5));
    }

    #[test]
    fn test_span_invalid() {
        assert!(PageSpan::parse("5").is_err());
        assert!(PageSpan::parse("-5").is_err());
        assert!(PageSpan::parse("a-b").is_err());
    }

    #[test]
    fn test_default_mapping() {
        let map = PageRangeMap::default();
        assert_eq!(map, PageRangeMap::parse("0-1,1-2,2-3,3-4,4-5").unwrap());
        assert_eq!(map.len(), 5);
        assert_eq!(map.last_index(), 4);
    }

    #[test]
    fn test_parse_implicit_indices() {
        let map = PageRangeMap::parse("0-2, 2-3,3-7").unwrap();
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(
            entries,
            vec![
                (0, PageSpan::new(0, 2)),
                (1, PageSpan::new(2, 3)),
                (2, PageSpan::new(3, 7)),
            ]
        );
    }

    #[test]
    fn test_parse_explicit_indices() {
        let map = PageRangeMap::parse("3:0-1,4:1-2,2-4").unwrap();
        assert_eq!(map.first_index(), 3);
        assert_eq!(map.last_index(), 5);
    }

    #[test]
    fn test_parse_non_consecutive_indices() {
        assert!(PageRangeMap::parse("0:0-1,2:1-2").is_err());
        assert!(PageRangeMap::parse("0-1,,1-2").is_err());
    }

    #[test]
    fn test_parse_index_overflow() {
        let err = PageRangeMap::parse("4294967295:0-1,1-2").unwrap_err();
        assert!(err.to_string().contains("Output index overflow"));

        let map = PageRangeMap::parse("4294967295:0-1").unwrap();
        assert_eq!(map.last_index(), u32::MAX);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(u32::MAX, PageSpan::new(0, 1))]);
    }

    #[test]
    fn test_json_mapping() {
        let map = PageRangeMap::from_json_str(r#"{"1": [2, 4], "0": [0, 2]}"#).unwrap();
        assert_eq!(map, PageRangeMap::parse("0-2,2-4").unwrap());

        assert!(PageRangeMap::from_json_str(r#"{"0": [0, 1], "2": [1, 2]}"#).is_err());
        assert!(PageRangeMap::from_json_str("{}").is_err());
        assert!(PageRangeMap::from_json_str(r#"{"0": [0]}"#).is_err());
    }

    #[test]
    fn test_validate_ok() {
        let map = PageRangeMap::parse("0-1,1-1,1-4").unwrap();
        assert!(map.validate(4).is_ok());
    }

    #[test]
    fn test_validate_gap() {
        let map = PageRangeMap::parse("0-1,2-3").unwrap();
        let err = map.validate(3).unwrap_err();
        assert!(err.to_string().contains("Gap"));
    }

    #[test]
    fn test_validate_overlap_and_inverted() {
        assert!(PageRangeMap::parse("0-2,1-3").unwrap().validate(3).is_err());
        assert!(PageRangeMap::parse("0-2,3-2").unwrap().validate(3).is_err());
        assert!(PageRangeMap::parse("1-3").unwrap().validate(3).is_err());
    }

    #[test]
    fn test_validate_coverage() {
        let map = PageRangeMap::default();
        assert!(map.validate(5).is_ok());
        assert!(map.validate(4).is_err());
        assert!(map.validate(6).is_err());
    }

    #[test]
    fn test_target_of() {
        let map = PageRangeMap::parse("5:0-2,2-2,2-3,3-6").unwrap();
        map.validate(6).unwrap();
        assert_eq!(map.target_of(0), Some(5));
        assert_eq!(map.target_of(1), Some(5));
        // 2-2 is empty, so page 2 lands in the following span
        assert_eq!(map.target_of(2), Some(7));
        assert_eq!(map.target_of(5), Some(8));
        assert_eq!(map.target_of(6), None);
    }
}
