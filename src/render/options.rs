//! Export options and configuration.

use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Producer string written into PDF metadata by default.
pub const DEFAULT_PRODUCER: &str = concat!("ofd2pdf ", env!("CARGO_PKG_VERSION"));

/// Options for exporting a parsed document.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Page selection
    pub page_selection: PageSelection,

    /// Draw annotation appearances after page content
    pub annotations: bool,

    /// Draw seal stamps after page content
    pub seals: bool,

    /// Emit the document outline as PDF bookmarks
    pub outline: bool,

    /// Embed attachments as PDF embedded files
    pub attachments: bool,

    /// Producer entry of the PDF document info
    pub producer: Option<String>,

    /// Compress content streams with Flate
    pub compress: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set specific pages.
    pub fn with_page_list(mut self, pages: Vec<u32>) -> Self {
        self.page_selection = PageSelection::Pages(pages);
        self
    }

    /// Enable or disable annotations.
    pub fn with_annotations(mut self, include: bool) -> Self {
        self.annotations = include;
        self
    }

    /// Enable or disable seal stamps.
    pub fn with_seals(mut self, include: bool) -> Self {
        self.seals = include;
        self
    }

    /// Enable or disable bookmarks.
    pub fn with_outline(mut self, include: bool) -> Self {
        self.outline = include;
        self
    }

    /// Enable or disable embedded attachments.
    pub fn with_attachments(mut self, include: bool) -> Self {
        self.attachments = include;
        self
    }

    /// Set the producer string; `None` omits it.
    pub fn with_producer(mut self, producer: Option<String>) -> Self {
        self.producer = producer;
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_selection: PageSelection::All,
            annotations: true,
            seals: true,
            outline: true,
            attachments: true,
            producer: Some(DEFAULT_PRODUCER.to_string()),
            compress: true,
        }
    }
}

/// Page selection for reading and export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Sorted, non-overlapping page ranges (1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => {
                let index = ranges.partition_point(|r| *r.end() < page);
                ranges.get(index).is_some_and(|r| r.contains(&page))
            }
        }
    }

    /// Check the selection against a document's page count.
    pub fn validate(&self, page_count: u32) -> Result<()> {
        let first_missing = match self {
            PageSelection::All => None,
            PageSelection::Range(range) => {
                if range.is_empty() || *range.start() == 0 {
                    return Err(Error::InvalidPageRange(format!(
                        "{}-{}",
                        range.start(),
                        range.end()
                    )));
                }
                (*range.start() > page_count).then_some(*range.start())
            }
            PageSelection::Pages(pages) => pages
                .iter()
                .copied()
                .find(|&p| p == 0 || p > page_count),
            PageSelection::Ranges(ranges) => {
                if let Some(r) = ranges.iter().find(|r| r.is_empty() || *r.start() == 0) {
                    return Err(Error::InvalidPageRange(format!("{}-{}", r.start(), r.end())));
                }
                ranges
                    .iter()
                    .map(|r| *r.start())
                    .find(|&start| start > page_count)
            }
        };

        match first_missing {
            Some(page) => Err(Error::PageOutOfRange(page, page_count)),
            None => Ok(()),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());

        // Check for simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                if start == 0 || start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Comma-separated list of pages and ranges
        let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (
                    start.trim().parse::<u32>().map_err(|_| invalid())?,
                    end.trim().parse::<u32>().map_err(|_| invalid())?,
                ),
                None => {
                    let p = part.parse::<u32>().map_err(|_| invalid())?;
                    (p, p)
                }
            };
            if start == 0 || start > end {
                return Err(invalid());
            }
            ranges.push(start..=end);
        }

        Ok(Self::from_ranges(ranges))
    }

    /// Sort and merge ranges; a list of single pages becomes `Pages`.
    fn from_ranges(mut ranges: Vec<RangeInclusive<u32>>) -> Self {
        ranges.sort_by_key(|r| *r.start());

        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    if range.end() > last.end() {
                        *last = *last.start()..=*range.end();
                    }
                }
                _ => merged.push(range),
            }
        }

        if merged.iter().all(|r| r.start() == r.end()) {
            PageSelection::Pages(merged.iter().map(|r| *r.start()).collect())
        } else {
            PageSelection::Ranges(merged)
        }
    }
}
