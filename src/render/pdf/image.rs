//! Image XObjects from MultiMedia resources.

use image::{DynamicImage, GenericImageView, ImageFormat};
use lopdf::{dictionary, Document as PdfDocument, ObjectId, Stream};

use super::deflate;
use crate::error::{Error, Result};

/// How the pixel data of an image XObject is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageFilter {
    /// Original JPEG bytes
    Dct,
    /// Zlib-compressed raw samples
    Flate,
}

impl ImageFilter {
    fn name(&self) -> &'static str {
        match self {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// An image ready to be written as an XObject.
#[derive(Debug, Clone)]
pub(crate) struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
    /// Compressed 8-bit alpha channel
    pub smask: Option<Vec<u8>>,
}

/// Decode an image file and encode it for PDF.
pub(crate) fn encode_image(data: &[u8]) -> Result<EncodedImage> {
    if data.is_empty() {
        return Err(Error::Image("image data is empty".into()));
    }
    let format = image::guess_format(data)?;
    let decoded = image::load_from_memory_with_format(data, format)?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Image("image has no pixels".into()));
    }

    if format == ImageFormat::Jpeg {
        let color_space = match decoded {
            DynamicImage::ImageLuma8(_) => Some("DeviceGray"),
            DynamicImage::ImageRgb8(_) => Some("DeviceRGB"),
            _ => None,
        };
        if let Some(color_space) = color_space {
            return Ok(EncodedImage {
                width,
                height,
                color_space,
                filter: ImageFilter::Dct,
                data: data.to_vec(),
                smask: None,
            });
        }
    }

    let smask = if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
        // Fully opaque masks are dropped
        if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(deflate(&alpha)?)
        }
    } else {
        None
    };

    Ok(EncodedImage {
        width,
        height,
        color_space: "DeviceRGB",
        filter: ImageFilter::Flate,
        data: deflate(decoded.to_rgb8().as_raw())?,
        smask,
    })
}

/// Add the image (and its soft mask) to the PDF.
pub(crate) fn write_image(pdf: &mut PdfDocument, image: EncodedImage) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => image.color_space,
        "BitsPerComponent" => 8,
        "Filter" => image.filter.name(),
    };

    if let Some(mask) = image.smask {
        let mask_id = pdf.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => ImageFilter::Flate.name(),
            },
            mask,
        ));
        dict.set("SMask", mask_id);
    }

    pdf.add_object(Stream::new(dict, image.data))
}
