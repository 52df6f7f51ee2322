//! OFD document parser.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::detect::{detect_format_from_reader, OfdFormat};
use crate::error::{Error, Result};
use crate::model::{
    Attachment, Document, MediaType, MultiMedia, Outline, OutlineItem, Page, Resources, Seal,
    SealAppearance, Template, TemplateRef, ZOrder,
};
use crate::package::{parent_dir, resolve_loc, OfdPackage, ROOT_ENTRY};

use super::content::{parse_page_annotations, parse_page_content, PageContent};
use super::document::{
    parse_annotation_index, parse_attachments, parse_document, parse_ofd_entry, DocumentDecl,
    OutlineDecl,
};
use super::options::{ErrorMode, ReadOptions};
use super::resource::parse_res;
use super::signature::{
    locate_seal_picture, parse_signature, parse_signature_list, SealPicture, SignatureEntry,
};

/// OFD document parser.
///
/// Owns the container for the duration of parsing; [`OfdParser::parse`]
/// consumes the parser, so the underlying file is closed when it returns.
pub struct OfdParser<R: Read + Seek> {
    package: OfdPackage<R>,
    format: OfdFormat,
    options: ReadOptions,
}

impl OfdParser<BufReader<File>> {
    /// Open an OFD file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ReadOptions::default())
    }

    /// Open an OFD file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found(path),
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file), options)
    }
}

impl OfdParser<Cursor<Vec<u8>>> {
    /// Parse an OFD from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ReadOptions::default())
    }

    /// Parse an OFD from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ReadOptions) -> Result<Self> {
        Self::from_reader(Cursor::new(data.to_vec()), options)
    }
}

impl<R: Read + Seek> OfdParser<R> {
    /// Validate and open a container from any seekable reader.
    pub fn from_reader(mut reader: R, options: ReadOptions) -> Result<Self> {
        let format = detect_format_from_reader(&mut reader)?;
        reader.rewind()?;
        let package = OfdPackage::new(reader)?;
        Ok(Self {
            package,
            format,
            options,
        })
    }

    /// Format declared by the container.
    pub fn format(&self) -> &OfdFormat {
        &self.format
    }

    /// Parse the document and return a structured Document.
    pub fn parse(mut self) -> Result<Document> {
        let entry_name = self
            .package
            .find_entry(ROOT_ENTRY)
            .ok_or_else(|| Error::MissingPart(ROOT_ENTRY.to_string()))?;
        let entry = parse_ofd_entry(&self.package.read_string(&entry_name)?)?;
        if entry.doc_bodies > 1 {
            log::warn!(
                "container holds {} documents, only the first is read",
                entry.doc_bodies
            );
        }

        let doc_root = entry
            .doc_root
            .ok_or_else(|| Error::MissingPart("DocBody/DocRoot".into()))?;
        let doc_path = resolve_loc("", &doc_root)?;
        let doc_dir = parent_dir(&doc_path).to_string();
        let decl = parse_document(&self.package.read_string(&doc_path)?)?;

        let mut document = Document::new();
        document.metadata = entry.metadata;
        document.metadata.ofd_version = self.format.version.clone();
        document.metadata.doc_type = self.format.doc_type.clone();
        if let Some(area) = decl.page_area.filter(|a| !a.is_empty()) {
            document.page_area = area;
        }
        document.default_color_space = decl.default_cs.clone();

        let total_pages = decl.pages.len() as u32;
        document.metadata.page_count = total_pages;
        self.options.pages.validate(total_pages)?;

        for loc in decl.public_res.iter().chain(&decl.document_res) {
            let path = resolve_loc(&doc_dir, loc)?;
            let resources = self.load_res(&path)?;
            document.resources.merge(resources);
        }

        for tpl in &decl.templates {
            let path = resolve_loc(&doc_dir, &tpl.base_loc)?;
            match self.load_content(&path, &mut document.resources) {
                Ok(content) => {
                    document.templates.insert(
                        tpl.id.clone(),
                        Template {
                            id: tpl.id.clone(),
                            name: tpl.name.clone(),
                            z_order: tpl.z_order,
                            layers: content.layers,
                        },
                    );
                }
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to parse template page {}: {}", tpl.id, e);
                }
                Err(e) => return Err(e),
            }
        }

        for (index, page_decl) in decl.pages.iter().enumerate() {
            let number = index as u32 + 1;
            if !self.options.pages.includes(number) {
                continue;
            }

            let path = resolve_loc(&doc_dir, &page_decl.base_loc)?;
            let page = match self.load_content(&path, &mut document.resources) {
                Ok(content) => build_page(number, &page_decl.id, content, &document),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to parse page {}: {}", number, e);
                    Page::new(number, page_decl.id.clone(), document.page_area)
                }
                Err(e) => return Err(e),
            };
            document.add_page(page);
        }

        if self.options.annotations {
            if let Some(loc) = &decl.annotations {
                self.load_annotations(&doc_dir, loc, &mut document);
            }
        }

        if !decl.outlines.is_empty() {
            let page_numbers = page_number_map(&decl);
            let mut outline = Outline::new();
            for item in &decl.outlines {
                outline.add_item(build_outline(item, 0, &page_numbers));
            }
            document.outline = Some(outline);
        }

        if self.options.attachments {
            if let Some(loc) = &decl.attachments {
                document.attachments = self.load_attachments(&doc_dir, loc);
            }
        }

        if self.options.load_media {
            self.load_media(&mut document.resources);
        }

        if self.options.seals {
            if let Some(loc) = &entry.signatures {
                document.seals = self.load_seals(loc, &doc_dir);
            }
        }

        log::debug!(
            "parsed {} of {} pages, {} resources",
            document.page_count(),
            total_pages,
            document.resources.len()
        );
        Ok(document)
    }

    fn load_res(&mut self, path: &str) -> Result<Resources> {
        let xml = self.package.read_string(path)?;
        parse_res(&xml, path)
    }

    /// Load a page or template content file, merging its PageRes.
    fn load_content(&mut self, path: &str, resources: &mut Resources) -> Result<PageContent> {
        let xml = self.package.read_string(path)?;
        let content = parse_page_content(&xml)?;
        let dir = parent_dir(path).to_string();
        for loc in &content.page_res {
            let res_path = resolve_loc(&dir, loc)?;
            let page_res = self.load_res(&res_path)?;
            resources.merge(page_res);
        }
        Ok(content)
    }

    fn load_annotations(&mut self, doc_dir: &str, loc: &str, document: &mut Document) {
        let index_path = match resolve_loc(doc_dir, loc) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Invalid annotation index location: {}", e);
                return;
            }
        };
        let entries = match self
            .package
            .read_string(&index_path)
            .and_then(|xml| parse_annotation_index(&xml))
        {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to read annotation index: {}", e);
                return;
            }
        };

        let index_dir = parent_dir(&index_path).to_string();
        for (page_id, file_loc) in entries {
            let Some(page) = document.pages.iter_mut().find(|p| p.id == page_id) else {
                continue;
            };
            let annotations = resolve_loc(&index_dir, &file_loc).and_then(|path| {
                let xml = self.package.read_string(&path)?;
                parse_page_annotations(&xml)
            });
            match annotations {
                Ok(annotations) => page.annotations.extend(annotations),
                Err(e) => log::warn!("Failed to read annotations of page {}: {}", page_id, e),
            }
        }
    }

    fn load_attachments(&mut self, doc_dir: &str, loc: &str) -> Vec<Attachment> {
        let decls = resolve_loc(doc_dir, loc).and_then(|path| {
            let xml = self.package.read_string(&path)?;
            Ok((parent_dir(&path).to_string(), parse_attachments(&xml)?))
        });
        let (dir, decls) = match decls {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to read attachments: {}", e);
                return Vec::new();
            }
        };

        let mut attachments = Vec::new();
        for decl in decls {
            let loaded = resolve_loc(&dir, &decl.file_loc)
                .and_then(|path| Ok((self.package.read_bytes(&path)?, path)));
            match loaded {
                Ok((data, path)) => {
                    if let Some(declared) = decl.size {
                        // Size is declared in KB
                        let actual = data.len() as f64 / 1024.0;
                        if (declared - actual).abs() > 1.0 {
                            log::debug!(
                                "attachment {}: declared size {} KB, actual {:.1} KB",
                                decl.id,
                                declared,
                                actual
                            );
                        }
                    }
                    attachments.push(Attachment {
                        id: decl.id,
                        name: decl.name,
                        format: decl.format,
                        creation_date: decl.creation_date,
                        path,
                        data,
                    });
                }
                Err(e) => log::warn!("Skipping attachment {}: {}", decl.name, e),
            }
        }
        attachments
    }

    fn load_media(&mut self, resources: &mut Resources) {
        for media in resources.media.values_mut() {
            if media.path.is_empty() {
                log::warn!("multimedia {} has no MediaFile", media.id);
                continue;
            }
            match self.package.read_bytes(&media.path) {
                Ok(data) => media.data = data,
                Err(e) => log::warn!("Failed to load multimedia {}: {}", media.id, e),
            }
        }
    }

    /// Resolve `loc` against each base directory in turn and return the
    /// first path present in the container.
    fn locate(&self, bases: &[&str], loc: &str) -> Result<String> {
        let mut first = None;
        for base in bases {
            let path = resolve_loc(base, loc)?;
            if self.package.exists(&path) {
                return Ok(path);
            }
            first.get_or_insert(path);
        }
        Err(Error::MissingPart(first.unwrap_or_else(|| loc.to_string())))
    }

    fn load_seals(&mut self, loc: &str, doc_dir: &str) -> Vec<Seal> {
        let entries = resolve_loc("", loc).and_then(|path| {
            let xml = self.package.read_string(&path)?;
            Ok((parent_dir(&path).to_string(), parse_signature_list(&xml)?))
        });
        let (list_dir, entries) = match entries {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to read signature list: {}", e);
                return Vec::new();
            }
        };

        let mut seals = Vec::new();
        for entry in entries {
            match self.load_seal(&entry, &list_dir, doc_dir) {
                Ok(Some(seal)) => seals.push(seal),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping seal of signature {}: {}", entry.id, e),
            }
        }
        seals
    }

    fn load_seal(
        &mut self,
        entry: &SignatureEntry,
        list_dir: &str,
        doc_dir: &str,
    ) -> Result<Option<Seal>> {
        let path = self.locate(&[list_dir, doc_dir], &entry.base_loc)?;
        let decl = parse_signature(&self.package.read_string(&path)?)?;
        if decl.stamps.is_empty() {
            log::debug!("signature {} has no StampAnnot", entry.id);
            return Ok(None);
        }

        let sig_dir = parent_dir(&path).to_string();
        let sources = [decl.signed_value.as_deref(), decl.seal_loc.as_deref()];
        for loc in sources.into_iter().flatten() {
            let loaded = self
                .locate(&[&sig_dir, ""], loc)
                .and_then(|p| Ok((self.package.read_bytes(&p)?, p)));
            let (data, data_path) = match loaded {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("signature {}: {}", entry.id, e);
                    continue;
                }
            };
            let Some(appearance) = self.seal_appearance(&entry.id, &data_path, &data) else {
                continue;
            };
            return Ok(Some(Seal {
                signature_id: entry.id.clone(),
                stamps: decl.stamps,
                appearance,
            }));
        }

        log::warn!(
            "seal of signature {} has no picture readable without SES decoding, skipped",
            entry.id
        );
        Ok(None)
    }

    fn seal_appearance(&self, id: &str, path: &str, data: &[u8]) -> Option<SealAppearance> {
        match locate_seal_picture(data)? {
            SealPicture::Image(bytes, format) => Some(SealAppearance::Image(MultiMedia {
                id: id.to_string(),
                media_type: MediaType::Image,
                format: Some(format.to_string()),
                path: path.to_string(),
                data: bytes.to_vec(),
            })),
            SealPicture::Ofd(bytes) => {
                let options = ReadOptions::new()
                    .with_error_mode(self.options.error_mode)
                    .with_annotations(false)
                    .with_attachments(false)
                    .with_seals(false);
                match OfdParser::from_bytes_with_options(bytes, options).and_then(|p| p.parse()) {
                    Ok(doc) => Some(SealAppearance::Ofd(Box::new(doc))),
                    Err(e) => {
                        log::warn!("Failed to parse seal document in {}: {}", path, e);
                        None
                    }
                }
            }
        }
    }
}

fn build_page(number: u32, id: &str, content: PageContent, document: &Document) -> Page {
    let area = content
        .area
        .filter(|a| !a.is_empty())
        .unwrap_or(document.page_area);
    let mut page = Page::new(number, id, area);

    for (template_id, z_order) in content.templates {
        let default_z = document
            .templates
            .get(&template_id)
            .map(|t| t.z_order)
            .unwrap_or(ZOrder::Background);
        if !document.templates.contains_key(&template_id) {
            log::warn!("page {} references unknown template {}", number, template_id);
        }
        page.templates.push(TemplateRef {
            id: template_id,
            z_order: z_order.unwrap_or(default_z),
        });
    }

    page.layers = content.layers;
    page
}

fn page_number_map(decl: &DocumentDecl) -> HashMap<String, u32> {
    decl.pages
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i as u32 + 1))
        .collect()
}

fn build_outline(decl: &OutlineDecl, level: u8, pages: &HashMap<String, u32>) -> OutlineItem {
    let page = decl.page_id.as_ref().and_then(|id| pages.get(id).copied());
    let mut item = OutlineItem::new(decl.title.clone(), page, level);
    item.expanded = decl.expanded;
    for child in &decl.children {
        item.add_child(build_outline(child, level.saturating_add(1), pages));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;
    use crate::package::tests::zip_bytes;
    use crate::render::PageSelection;

    const OFD_XML: &str = r#"<ofd:OFD xmlns:ofd="http://www.ofdspec.org/2016" Version="1.1" DocType="OFD">
      <ofd:DocBody><ofd:DocRoot>Doc_0/Document.xml</ofd:DocRoot></ofd:DocBody>
    </ofd:OFD>"#;

    const DOCUMENT_XML: &str = r#"<ofd:Document xmlns:ofd="http://www.ofdspec.org/2016">
      <ofd:CommonData>
        <ofd:PageArea><ofd:PhysicalBox>0 0 210 297</ofd:PhysicalBox></ofd:PageArea>
        <ofd:TemplatePage ID="9" BaseLoc="Tpls/Tpl_0/Content.xml"/>
        <ofd:DefaultCS>4</ofd:DefaultCS>
      </ofd:CommonData>
      <ofd:Pages>
        <ofd:Page ID="1" BaseLoc="Pages/Page_0/Content.xml"/>
        <ofd:Page ID="2" BaseLoc="Pages/Page_1/Content.xml"/>
      </ofd:Pages>
    </ofd:Document>"#;

    const GOOD_CONTENT: &str = r#"<ofd:Page xmlns:ofd="http://www.ofdspec.org/2016"><ofd:Content>
      <ofd:Layer ID="20"><ofd:PathObject ID="21" Boundary="0 0 10 10">
        <ofd:AbbreviatedData>M 0 0 L 10 10</ofd:AbbreviatedData>
      </ofd:PathObject></ofd:Layer>
    </ofd:Content></ofd:Page>"#;

    const BROKEN_CONTENT: &str =
        r#"<Page><Content><Layer><PathObject Boundary="0 0"/></Layer></Content></Page>"#;

    fn container(page_1: &str, template: &str) -> Vec<u8> {
        zip_bytes(&[
            ("OFD.xml", OFD_XML),
            ("Doc_0/Document.xml", DOCUMENT_XML),
            ("Doc_0/Tpls/Tpl_0/Content.xml", template),
            ("Doc_0/Pages/Page_0/Content.xml", GOOD_CONTENT),
            ("Doc_0/Pages/Page_1/Content.xml", page_1),
        ])
    }

    fn parse(data: &[u8], options: ReadOptions) -> Result<Document> {
        OfdParser::from_bytes_with_options(data, options)?.parse()
    }

    #[test]
    fn test_parse_pages_and_template() {
        let doc = parse(&container(GOOD_CONTENT, GOOD_CONTENT), ReadOptions::new()).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.metadata.page_count, 2);
        assert!(doc.templates.contains_key("9"));
        assert_eq!(doc.default_color_space.as_deref(), Some("4"));
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.pages[1].layers.len(), 1);
    }

    #[test]
    fn test_strict_mode_fails_on_broken_page() {
        let data = container(BROKEN_CONTENT, GOOD_CONTENT);
        assert!(matches!(
            parse(&data, ReadOptions::new()),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_lenient_mode_keeps_broken_page_empty() {
        let data = container(BROKEN_CONTENT, GOOD_CONTENT);
        let doc = parse(&data, ReadOptions::new().lenient()).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.metadata.page_count, 2);
        assert_eq!(doc.pages[0].layers.len(), 1);

        let broken = &doc.pages[1];
        assert_eq!(broken.number, 2);
        assert_eq!(broken.id, "2");
        assert!(broken.layers.is_empty());
        assert_eq!(broken.area, doc.page_area);
    }

    #[test]
    fn test_broken_template() {
        let data = container(GOOD_CONTENT, BROKEN_CONTENT);
        assert!(matches!(
            parse(&data, ReadOptions::new()),
            Err(Error::Xml(_))
        ));

        let doc = parse(&data, ReadOptions::new().lenient()).unwrap();
        assert!(!doc.templates.contains_key("9"));
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages.iter().all(|p| p.layers.len() == 1));
    }

    #[test]
    fn test_page_selection_keeps_numbering() {
        let data = container(GOOD_CONTENT, GOOD_CONTENT);
        let options = ReadOptions::new().with_pages(PageSelection::Pages(vec![2]));
        let doc = parse(&data, options).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].number, 2);
        assert_eq!(doc.pages[0].id, "2");
        assert_eq!(doc.metadata.page_count, 2);
    }

    #[test]
    fn test_unselected_broken_page_is_not_read() {
        let data = container(BROKEN_CONTENT, GOOD_CONTENT);
        let options = ReadOptions::new().with_pages(PageSelection::Pages(vec![1]));
        let doc = parse(&data, options).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].number, 1);
    }

    #[test]
    fn test_selection_past_last_page() {
        let data = container(GOOD_CONTENT, GOOD_CONTENT);
        let options = ReadOptions::new().with_pages(PageSelection::Range(2..=5));
        assert_eq!(parse(&data, options).unwrap().page_count(), 1);

        let options = ReadOptions::new().with_pages(PageSelection::Range(3..=5));
        assert!(matches!(
            parse(&data, options),
            Err(Error::PageOutOfRange(3, 2))
        ));
    }

    const SIGNED_OFD_XML: &str = r#"<ofd:OFD xmlns:ofd="http://www.ofdspec.org/2016" Version="1.1" DocType="OFD">
      <ofd:DocBody>
        <ofd:DocRoot>Doc_0/Document.xml</ofd:DocRoot>
        <ofd:Signatures>Doc_0/Signs/Signatures.xml</ofd:Signatures>
      </ofd:DocBody>
    </ofd:OFD>"#;

    const SIGNATURES: &str = r#"<ofd:Signatures xmlns:ofd="http://www.ofdspec.org/2016">
      <ofd:MaxSignId>4</ofd:MaxSignId>
      <ofd:Signature ID="1" Type="Seal" BaseLoc="Sign_0/Signature.xml"/>
      <ofd:Signature ID="2" Type="Seal" BaseLoc="/Doc_0/Signs/Sign_1/Signature.xml"/>
      <ofd:Signature ID="3" Type="Seal" BaseLoc="Sign_2/Signature.xml"/>
      <ofd:Signature ID="4" Type="Seal" BaseLoc="Sign_3/Signature.xml"/>
    </ofd:Signatures>"#;

    fn signature_xml(page: &str) -> String {
        format!(
            r#"<ofd:Signature xmlns:ofd="http://www.ofdspec.org/2016">
              <ofd:SignedInfo>
                <ofd:StampAnnot ID="1" PageRef="{}" Boundary="100 200 40 40"/>
                <ofd:Seal><ofd:BaseLoc>Seal.esl</ofd:BaseLoc></ofd:Seal>
              </ofd:SignedInfo>
              <ofd:SignedValue>SignedValue.dat</ofd:SignedValue>
            </ofd:Signature>"#,
            page
        )
    }

    fn png() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn wrapped(picture: &[u8]) -> Vec<u8> {
        let mut data = vec![0x30, 0x82, 0x02, 0x10, 0x04, 0x03, 0x45, 0x53];
        data.extend_from_slice(picture);
        data.extend_from_slice(&[0x03, 0x41, 0x00, 0x7F]);
        data
    }

    /// Four signatures: a PNG in the signed value, a PNG only in the seal
    /// file, an OFD seal, and one with no readable picture.
    fn signed_container() -> Vec<u8> {
        let junk = wrapped(&[]);
        let seal_doc = container(GOOD_CONTENT, GOOD_CONTENT);
        let entries: Vec<(&str, Vec<u8>)> = vec![
            ("OFD.xml", SIGNED_OFD_XML.into()),
            ("Doc_0/Document.xml", DOCUMENT_XML.into()),
            ("Doc_0/Tpls/Tpl_0/Content.xml", GOOD_CONTENT.into()),
            ("Doc_0/Pages/Page_0/Content.xml", GOOD_CONTENT.into()),
            ("Doc_0/Pages/Page_1/Content.xml", GOOD_CONTENT.into()),
            ("Doc_0/Signs/Signatures.xml", SIGNATURES.into()),
            ("Doc_0/Signs/Sign_0/Signature.xml", signature_xml("2").into_bytes()),
            ("Doc_0/Signs/Sign_0/SignedValue.dat", wrapped(&png())),
            ("Doc_0/Signs/Sign_1/Signature.xml", signature_xml("1").into_bytes()),
            ("Doc_0/Signs/Sign_1/SignedValue.dat", junk.clone()),
            ("Doc_0/Signs/Sign_1/Seal.esl", wrapped(&png())),
            ("Doc_0/Signs/Sign_2/Signature.xml", signature_xml("1").into_bytes()),
            ("Doc_0/Signs/Sign_2/SignedValue.dat", wrapped(&seal_doc)),
            ("Doc_0/Signs/Sign_3/Signature.xml", signature_xml("1").into_bytes()),
            ("Doc_0/Signs/Sign_3/SignedValue.dat", junk),
        ];
        zip_bytes(&entries)
    }

    #[test]
    fn test_seal_stamps() {
        let doc = parse(&signed_container(), ReadOptions::new()).unwrap();
        assert_eq!(doc.seals.len(), 3);

        let seal = &doc.seals[0];
        assert_eq!(seal.signature_id, "1");
        assert_eq!(seal.stamps.len(), 1);
        assert_eq!(seal.stamps[0].page_id, "2");
        assert_eq!(seal.stamps[0].boundary, Rect::new(100.0, 200.0, 40.0, 40.0));
        match &seal.appearance {
            SealAppearance::Image(media) => {
                assert_eq!(media.format.as_deref(), Some("PNG"));
                assert_eq!(media.data, png());
                assert_eq!(media.path, "Doc_0/Signs/Sign_0/SignedValue.dat");
            }
            other => panic!("unexpected appearance {:?}", other),
        }

        match &doc.seals[1].appearance {
            SealAppearance::Image(media) => {
                assert_eq!(media.path, "Doc_0/Signs/Sign_1/Seal.esl");
            }
            other => panic!("unexpected appearance {:?}", other),
        }

        assert_eq!(doc.seals[2].signature_id, "3");
        match &doc.seals[2].appearance {
            SealAppearance::Ofd(seal_doc) => {
                assert_eq!(seal_doc.page_count(), 2);
                assert!(seal_doc.seals.is_empty());
            }
            other => panic!("unexpected appearance {:?}", other),
        }
    }

    #[test]
    fn test_seals_can_be_skipped() {
        let options = ReadOptions::new().with_seals(false);
        let doc = parse(&signed_container(), options).unwrap();
        assert!(doc.seals.is_empty());

        let doc = parse(&signed_container(), ReadOptions::new().text_only()).unwrap();
        assert!(doc.seals.is_empty());
    }
}
