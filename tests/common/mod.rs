//! OFD fixtures built in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const OFD_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:OFD xmlns:ofd="http://www.ofdspec.org/2016" Version="1.1" DocType="OFD">
  <ofd:DocBody>
    <ofd:DocInfo>
      <ofd:DocID>6f0b7c3a0a2b4c1d9e8f</ofd:DocID>
      <ofd:Title>电子发票</ofd:Title>
      <ofd:Author>Finance</ofd:Author>
      <ofd:CreationDate>2024-03-09</ofd:CreationDate>
      <ofd:Keywords><ofd:Keyword>invoice</ofd:Keyword><ofd:Keyword>tax</ofd:Keyword></ofd:Keywords>
    </ofd:DocInfo>
    <ofd:DocRoot>Doc_0/Document.xml</ofd:DocRoot>
  </ofd:DocBody>
</ofd:OFD>"#;

const PUBLIC_RES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Res xmlns:ofd="http://www.ofdspec.org/2016" BaseLoc="Res">
  <ofd:Fonts>
    <ofd:Font ID="2" FontName="SimSun" FamilyName="宋体"/>
    <ofd:Font ID="3" FontName="Arial" FamilyName="Arial"/>
  </ofd:Fonts>
  <ofd:ColorSpaces>
    <ofd:ColorSpace ID="4" Type="RGB" BitsPerComponent="8"/>
  </ofd:ColorSpaces>
  <ofd:DrawParams>
    <ofd:DrawParam ID="5" LineWidth="0.5">
      <ofd:StrokeColor Value="128 0 0"/>
    </ofd:DrawParam>
  </ofd:DrawParams>
</ofd:Res>"#;

const DOCUMENT_RES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Res xmlns:ofd="http://www.ofdspec.org/2016" BaseLoc="Res">
  <ofd:MultiMedias>
    <ofd:MultiMedia ID="6" Type="Image" Format="PNG">
      <ofd:MediaFile>seal.png</ofd:MediaFile>
    </ofd:MultiMedia>
  </ofd:MultiMedias>
</ofd:Res>"#;

const TEMPLATE_CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Page xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:Content>
    <ofd:Layer ID="20" DrawParam="5">
      <ofd:PathObject ID="21" Boundary="10 10 190 0.5">
        <ofd:AbbreviatedData>M 0 0 L 190 0</ofd:AbbreviatedData>
      </ofd:PathObject>
    </ofd:Layer>
  </ofd:Content>
</ofd:Page>"#;

const ANNOTATIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Annotations xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:Page PageID="1">
    <ofd:FileLoc>Pages/Page_0/Annotation.xml</ofd:FileLoc>
  </ofd:Page>
</ofd:Annotations>"#;

const PAGE_ANNOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:PageAnnot xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:Annot ID="30" Type="Stamp">
    <ofd:Appearance Boundary="150 250 30 30">
      <ofd:PathObject ID="31" Boundary="0 0 30 30" Stroke="true">
        <ofd:StrokeColor Value="255 0 0"/>
        <ofd:AbbreviatedData>M 15 0 A 15 15 0 1 1 15 30 A 15 15 0 1 1 15 0 C</ofd:AbbreviatedData>
      </ofd:PathObject>
    </ofd:Appearance>
  </ofd:Annot>
</ofd:PageAnnot>"#;

const ATTACHMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Attachments xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:Attachment ID="40" Name="invoice.xml" Format="xml" CreationDate="2024-03-09T08:00:00">
    <ofd:FileLoc>invoice.xml</ofd:FileLoc>
  </ofd:Attachment>
</ofd:Attachments>"#;

/// Content of a page with one text line and a frame.
pub fn page_content(text: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Page xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:Template TemplateID="10" ZOrder="Background"/>
  <ofd:Content>
    <ofd:Layer ID="11">
      <ofd:TextObject ID="12" Boundary="20 20 160 10" Font="2" Size="5">
        <ofd:FillColor Value="0 0 0"/>
        <ofd:TextCode X="0" Y="5" DeltaX="g 3 5">{}</ofd:TextCode>
      </ofd:TextObject>
      <ofd:PathObject ID="13" Boundary="15 15 180 20" Fill="true" Stroke="true">
        <ofd:FillColor Value="240 240 240" Alpha="128"/>
        <ofd:AbbreviatedData>M 0 0 L 180 0 L 180 20 L 0 20 C</ofd:AbbreviatedData>
      </ofd:PathObject>
      <ofd:ImageObject ID="14" Boundary="150 40 30 30" CTM="30 0 0 30 0 0" ResourceID="6"/>
    </ofd:Layer>
  </ofd:Content>
</ofd:Page>"#,
        text
    )
}

fn document_xml(page_count: usize, with_extras: bool) -> String {
    let pages: String = (0..page_count)
        .map(|i| {
            format!(
                r#"<ofd:Page ID="{}" BaseLoc="Pages/Page_{}/Content.xml"/>"#,
                i + 1,
                i
            )
        })
        .collect();
    let extras = if with_extras {
        r#"<ofd:Outlines>
    <ofd:OutlineElem Title="第一页">
      <ofd:Actions><ofd:Action Event="CLICK"><ofd:Goto><ofd:Dest Type="XYZ" PageID="1"/></ofd:Goto></ofd:Action></ofd:Actions>
    </ofd:OutlineElem>
  </ofd:Outlines>
  <ofd:Annotations>Annots/Annotations.xml</ofd:Annotations>
  <ofd:Attachments>Attachs/Attachments.xml</ofd:Attachments>"#
    } else {
        ""
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Document xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:CommonData>
    <ofd:MaxUnitID>99</ofd:MaxUnitID>
    <ofd:PageArea><ofd:PhysicalBox>0 0 210 297</ofd:PhysicalBox></ofd:PageArea>
    <ofd:PublicRes>PublicRes.xml</ofd:PublicRes>
    <ofd:DocumentRes>DocumentRes.xml</ofd:DocumentRes>
    <ofd:TemplatePage ID="10" BaseLoc="Tpls/Tpl_0/Content.xml"/>
  </ofd:CommonData>
  <ofd:Pages>{}</ofd:Pages>
  {}
</ofd:Document>"#,
        pages, extras
    )
}

/// A small opaque PNG.
pub fn png() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(4, 4, Rgba([200u8, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Zip the given entries.
pub fn zip_entries(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(data).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A document with `page_count` pages; `with_extras` adds an outline, an
/// annotation and an attachment.
pub fn build_ofd(page_count: usize, with_extras: bool) -> Vec<u8> {
    zip_owned(ofd_entries(page_count, with_extras))
}

fn zip_owned(entries: Vec<(String, Vec<u8>)>) -> Vec<u8> {
    let borrowed: Vec<(&str, Vec<u8>)> = entries
        .iter()
        .map(|(name, data)| (name.as_str(), data.clone()))
        .collect();
    zip_entries(&borrowed)
}

fn ofd_entries(page_count: usize, with_extras: bool) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<(String, Vec<u8>)> = vec![
        ("OFD.xml".into(), OFD_XML.into()),
        (
            "Doc_0/Document.xml".into(),
            document_xml(page_count, with_extras).into_bytes(),
        ),
        ("Doc_0/PublicRes.xml".into(), PUBLIC_RES.into()),
        ("Doc_0/DocumentRes.xml".into(), DOCUMENT_RES.into()),
        ("Doc_0/Res/seal.png".into(), png()),
        ("Doc_0/Tpls/Tpl_0/Content.xml".into(), TEMPLATE_CONTENT.into()),
    ];
    for i in 0..page_count {
        entries.push((
            format!("Doc_0/Pages/Page_{}/Content.xml", i),
            page_content(&format!("发票 No.{}", i + 1)).into_bytes(),
        ));
    }
    if with_extras {
        entries.push(("Doc_0/Annots/Annotations.xml".into(), ANNOTATIONS.into()));
        entries.push((
            "Doc_0/Annots/Pages/Page_0/Annotation.xml".into(),
            PAGE_ANNOT.into(),
        ));
        entries.push(("Doc_0/Attachs/Attachments.xml".into(), ATTACHMENTS.into()));
        entries.push((
            "Doc_0/Attachs/invoice.xml".into(),
            b"<Invoice><Total>100.00</Total></Invoice>".to_vec(),
        ));
    }

    entries
}

const SIGNATURES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Signatures xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:MaxSignId>1</ofd:MaxSignId>
  <ofd:Signature ID="1" Type="Seal" BaseLoc="/Doc_0/Signs/Sign_0/Signature.xml"/>
</ofd:Signatures>"#;

const SIGNATURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ofd:Signature xmlns:ofd="http://www.ofdspec.org/2016">
  <ofd:SignedInfo>
    <ofd:Provider ProviderName="Signer" Version="1.0"/>
    <ofd:SignatureMethod>1.2.156.10197.1.501</ofd:SignatureMethod>
    <ofd:StampAnnot ID="1" PageRef="1" Boundary="140 240 40 40"/>
  </ofd:SignedInfo>
  <ofd:SignedValue>/Doc_0/Signs/Sign_0/SignedValue.dat</ofd:SignedValue>
</ofd:Signature>"#;

/// A document whose first page carries a seal stamp. The seal PNG sits
/// inside opaque signature bytes.
pub fn sealed_ofd(page_count: usize) -> Vec<u8> {
    let mut entries = ofd_entries(page_count, false);
    entries[0].1 = OFD_XML
        .replace(
            "</ofd:DocRoot>",
            "</ofd:DocRoot>\n    <ofd:Signatures>Doc_0/Signs/Signatures.xml</ofd:Signatures>",
        )
        .into_bytes();

    let mut signed_value = vec![0x30, 0x82, 0x03, 0x00, 0x04, 0x02, 0x45, 0x53];
    signed_value.extend_from_slice(&png());
    signed_value.extend_from_slice(&[0x03, 0x41, 0x00, 0x5A, 0x11]);

    entries.push(("Doc_0/Signs/Signatures.xml".into(), SIGNATURES.into()));
    entries.push(("Doc_0/Signs/Sign_0/Signature.xml".into(), SIGNATURE.into()));
    entries.push(("Doc_0/Signs/Sign_0/SignedValue.dat".into(), signed_value));
    zip_owned(entries)
}

/// The single-page document used by most tests.
pub fn minimal_ofd() -> Vec<u8> {
    build_ofd(1, false)
}

/// Write bytes to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write fixture");
    path
}
