//! Reading options and configuration.

use crate::render::PageSelection;

/// Options for reading OFD documents.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to parse)
    pub pages: PageSelection,

    /// Whether to load page annotations
    pub annotations: bool,

    /// Whether to load attachments
    pub attachments: bool,

    /// Whether to load multimedia (image) data
    pub load_media: bool,

    /// Whether to load seal stamps from the signature list
    pub seals: bool,
}

impl ReadOptions {
    /// Create new read options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable annotation loading.
    pub fn with_annotations(mut self, load: bool) -> Self {
        self.annotations = load;
        self
    }

    /// Enable or disable attachment loading.
    pub fn with_attachments(mut self, load: bool) -> Self {
        self.attachments = load;
        self
    }

    /// Enable or disable loading of image data.
    pub fn with_media(mut self, load: bool) -> Self {
        self.load_media = load;
        self
    }

    /// Enable or disable seal stamp loading.
    pub fn with_seals(mut self, load: bool) -> Self {
        self.seals = load;
        self
    }

    /// Text only: skip images, annotations, attachments and seals.
    pub fn text_only(mut self) -> Self {
        self.load_media = false;
        self.annotations = false;
        self.attachments = false;
        self.seals = false;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
            annotations: true,
            attachments: true,
            load_media: true,
            seals: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid content and continue
    Lenient,
}
