//! Document-level types.

use super::{Page, Rect, Resources, Seal, Template};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed OFD document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (DocInfo plus container facts)
    pub metadata: Metadata,

    /// Parsed pages in document order
    pub pages: Vec<Page>,

    /// Default page area from CommonData
    pub page_area: Rect,

    /// Fonts, draw params, images and other resources
    pub resources: Resources,

    /// Color space for colors that do not reference one (`CommonData/DefaultCS`)
    #[serde(default)]
    pub default_color_space: Option<String>,

    /// Template pages keyed by ID
    pub templates: BTreeMap<String, Template>,

    /// Document outline (bookmarks)
    pub outline: Option<Outline>,

    /// Embedded attachments
    pub attachments: Vec<Attachment>,

    /// Electronic seals stamped on pages
    #[serde(default)]
    pub seals: Vec<Seal>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            pages: Vec::new(),
            page_area: Rect::a4(),
            resources: Resources::new(),
            default_color_space: None,
            templates: BTreeMap::new(),
            outline: None,
            attachments: Vec::new(),
            seals: Vec::new(),
        }
    }

    /// Number of parsed pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by its document page number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document identifier (DocID)
    pub doc_id: Option<String>,

    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Abstract
    pub abstract_text: Option<String>,

    /// Keywords
    pub keywords: Vec<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Creator application version
    pub creator_version: Option<String>,

    /// Creation date
    pub created: Option<NaiveDateTime>,

    /// Last modification date
    pub modified: Option<NaiveDateTime>,

    /// OFD version (e.g., "1.0")
    pub ofd_version: String,

    /// Document type ("OFD" or "OFD-A")
    pub doc_type: String,

    /// Total number of pages in the document
    pub page_count: u32,
}

impl Metadata {
    /// Create new metadata with an OFD version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            ofd_version: version.into(),
            doc_type: "OFD".to_string(),
            ..Default::default()
        }
    }

    /// Keywords joined for display.
    pub fn keywords_joined(&self) -> Option<String> {
        if self.keywords.is_empty() {
            None
        } else {
            Some(self.keywords.join(", "))
        }
    }
}

/// Document outline (bookmarks/table of contents).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level outline items
    pub items: Vec<OutlineItem>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the outline.
    pub fn add_item(&mut self, item: OutlineItem) {
        self.items.push(item);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of items (including nested).
    pub fn total_items(&self) -> usize {
        fn count_items(items: &[OutlineItem]) -> usize {
            items
                .iter()
                .map(|item| 1 + count_items(&item.children))
                .sum()
        }
        count_items(&self.items)
    }
}

/// A single outline item (bookmark).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Target page number (1-indexed)
    pub page: Option<u32>,

    /// Nesting level (0 = top level)
    pub level: u8,

    /// Whether the item starts expanded
    pub expanded: bool,

    /// Child items
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(title: impl Into<String>, page: Option<u32>, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            expanded: true,
            children: Vec::new(),
        }
    }

    /// Add a child item.
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }
}

/// A file attached to the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    /// Display name
    pub name: String,
    /// Declared format (file extension or MIME type)
    pub format: Option<String>,
    pub creation_date: Option<NaiveDateTime>,
    /// Resolved container path
    pub path: String,
    /// Raw file contents
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
