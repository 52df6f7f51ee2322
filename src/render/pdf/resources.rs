//! PDF resource bookkeeping.
//!
//! Fonts, images and graphics states are written once per document and
//! referenced by name from every page that uses them.

use std::collections::BTreeMap;

use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, ObjectId};

use super::font::FontFace;
use super::image::{encode_image, write_image};
use crate::model::MultiMedia;

/// Document-wide resource objects, named in order of first use.
#[derive(Debug, Default)]
pub(crate) struct SharedResources {
    fonts: BTreeMap<FontFace, (String, ObjectId)>,
    // Keyed by (scope, media ID); None marks media that failed to decode
    images: BTreeMap<(String, String), Option<(String, ObjectId)>>,
    image_count: usize,
    states: BTreeMap<(u8, u8), (String, ObjectId)>,
}

impl SharedResources {
    pub(crate) fn font(&mut self, pdf: &mut PdfDocument, face: FontFace) -> (String, ObjectId) {
        let next = self.fonts.len() + 1;
        self.fonts
            .entry(face)
            .or_insert_with(|| (format!("F{}", next), face.write(pdf)))
            .clone()
    }

    /// Image XObject for a media resource; `None` if it cannot be decoded.
    ///
    /// Media IDs are only unique within one document, so `scope` names the
    /// document the resource belongs to (empty for the main document).
    pub(crate) fn image(
        &mut self,
        pdf: &mut PdfDocument,
        scope: &str,
        media: &MultiMedia,
    ) -> Option<(String, ObjectId)> {
        let key = (scope.to_string(), media.id.clone());
        if let Some(entry) = self.images.get(&key) {
            return entry.clone();
        }

        let entry = match encode_image(&media.data) {
            Ok(encoded) => {
                self.image_count += 1;
                Some((format!("Im{}", self.image_count), write_image(pdf, encoded)))
            }
            Err(e) => {
                log::warn!("Skipping image {} ({}): {}", media.id, media.path, e);
                None
            }
        };
        self.images.insert(key, entry.clone());
        entry
    }

    /// Graphics state with the given stroke and fill alpha (0 to 255).
    pub(crate) fn alpha_state(
        &mut self,
        pdf: &mut PdfDocument,
        stroke: u8,
        fill: u8,
    ) -> (String, ObjectId) {
        let next = self.states.len() + 1;
        self.states
            .entry((stroke, fill))
            .or_insert_with(|| {
                let id = pdf.add_object(dictionary! {
                    "Type" => "ExtGState",
                    "CA" => Object::Real(stroke as f32 / 255.0),
                    "ca" => Object::Real(fill as f32 / 255.0),
                });
                (format!("GS{}", next), id)
            })
            .clone()
    }
}

/// Resources referenced by a single page.
#[derive(Debug, Default)]
pub(crate) struct PageResources {
    pub fonts: BTreeMap<String, ObjectId>,
    pub images: BTreeMap<String, ObjectId>,
    pub states: BTreeMap<String, ObjectId>,
}

impl PageResources {
    pub(crate) fn to_dictionary(&self) -> Dictionary {
        fn named(entries: &BTreeMap<String, ObjectId>) -> Dictionary {
            let mut dict = Dictionary::new();
            for (name, id) in entries {
                dict.set(name.as_bytes().to_vec(), *id);
            }
            dict
        }

        let mut dict = dictionary! {
            "ProcSet" => vec!["PDF".into(), "Text".into(), "ImageB".into(), "ImageC".into()],
        };
        if !self.fonts.is_empty() {
            dict.set("Font", named(&self.fonts));
        }
        if !self.images.is_empty() {
            dict.set("XObject", named(&self.images));
        }
        if !self.states.is_empty() {
            dict.set("ExtGState", named(&self.states));
        }
        dict
    }
}
