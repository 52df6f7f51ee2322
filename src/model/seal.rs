//! Electronic seal stamps.
//!
//! A signed document carries the seal picture inside its signature data.
//! Only the appearance is kept here; signatures are never verified.

use serde::{Deserialize, Serialize};

use super::{Document, MultiMedia, Rect};

/// A seal from one `Signature`, with every place it is stamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seal {
    /// `Signature/@ID` from the signature list
    pub signature_id: String,

    /// Stamp placements
    pub stamps: Vec<StampAnnot>,

    /// Picture drawn at each placement
    pub appearance: SealAppearance,
}

impl Seal {
    /// Stamps placed on the page with the given OFD ID.
    pub fn stamps_on<'a>(&'a self, page_id: &'a str) -> impl Iterator<Item = &'a StampAnnot> {
        self.stamps.iter().filter(move |s| s.page_id == page_id)
    }
}

/// Placement of a seal on a page (`SignedInfo/StampAnnot`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampAnnot {
    pub id: Option<String>,

    /// `PageRef`: OFD ID of the stamped page
    pub page_id: String,

    /// Position and size on the page
    pub boundary: Rect,

    /// Clip area relative to the boundary
    pub clip: Option<Rect>,
}

/// The seal picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SealAppearance {
    /// A raster image scaled to the stamp boundary
    Image(MultiMedia),
    /// An OFD document whose pages are drawn at the stamp position
    Ofd(Box<Document>),
}
