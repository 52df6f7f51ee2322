//! Benchmarks for OFD parsing and PDF rendering.
//!
//! Run with: cargo bench

use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const OFD_XML: &str = r#"<ofd:OFD xmlns:ofd="http://www.ofdspec.org/2016" Version="1.1" DocType="OFD">
<ofd:DocBody><ofd:DocInfo><ofd:Title>Benchmark</ofd:Title></ofd:DocInfo>
<ofd:DocRoot>Doc_0/Document.xml</ofd:DocRoot></ofd:DocBody></ofd:OFD>"#;

/// Build a synthetic OFD with `page_count` text-and-path pages.
fn create_test_ofd(page_count: usize) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("OFD.xml", options).unwrap();
    writer.write_all(OFD_XML.as_bytes()).unwrap();

    let pages: String = (0..page_count)
        .map(|i| format!(r#"<ofd:Page ID="{}" BaseLoc="Pages/Page_{}/Content.xml"/>"#, i + 1, i))
        .collect();
    writer.start_file("Doc_0/Document.xml", options).unwrap();
    write!(
        writer,
        r#"<ofd:Document xmlns:ofd="http://www.ofdspec.org/2016"><ofd:CommonData>
<ofd:PageArea><ofd:PhysicalBox>0 0 210 297</ofd:PhysicalBox></ofd:PageArea>
<ofd:PublicRes>PublicRes.xml</ofd:PublicRes></ofd:CommonData>
<ofd:Pages>{}</ofd:Pages></ofd:Document>"#,
        pages
    )
    .unwrap();

    writer.start_file("Doc_0/PublicRes.xml", options).unwrap();
    writer
        .write_all(br#"<ofd:Res xmlns:ofd="http://www.ofdspec.org/2016"><ofd:Fonts><ofd:Font ID="1" FontName="SimSun"/><ofd:Font ID="2" FontName="Arial"/></ofd:Fonts></ofd:Res>"#)
        .unwrap();

    for i in 0..page_count {
        writer
            .start_file(format!("Doc_0/Pages/Page_{}/Content.xml", i), options)
            .unwrap();
        let mut body = String::new();
        for line in 0..40 {
            let y = 20.0 + line as f64 * 6.0;
            body.push_str(&format!(
                r#"<ofd:TextObject ID="{id}" Boundary="20 {y} 170 6" Font="{font}" Size="4"><ofd:TextCode X="0" Y="4">Line {line} 增值税发票 benchmark content</ofd:TextCode></ofd:TextObject>
<ofd:PathObject ID="{pid}" Boundary="20 {y} 170 0.2"><ofd:AbbreviatedData>M 0 0 L 170 0</ofd:AbbreviatedData></ofd:PathObject>"#,
                id = line * 2 + 10,
                pid = line * 2 + 11,
                font = 1 + line % 2,
                y = y,
                line = line,
            ));
        }
        write!(
            writer,
            r#"<ofd:Page xmlns:ofd="http://www.ofdspec.org/2016"><ofd:Content><ofd:Layer ID="2">{}</ofd:Layer></ofd:Content></ofd:Page>"#,
            body
        )
        .unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Benchmark container detection.
fn bench_format_detection(c: &mut Criterion) {
    let data = create_test_ofd(1);
    let not_ofd = b"Not an OFD file at all, just random text content";

    c.bench_function("detect_valid_ofd", |b| {
        b.iter(|| ofd2pdf::detect_format_from_bytes(black_box(&data)).unwrap());
    });

    c.bench_function("detect_non_ofd", |b| {
        b.iter(|| ofd2pdf::detect_format_from_bytes(black_box(not_ofd)).is_err());
    });
}

/// Benchmark parsing at various sizes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ofd_parsing");

    for page_count in [1, 5, 20] {
        let data = create_test_ofd(page_count);
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| ofd2pdf::parse_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark PDF rendering of an already parsed document.
fn bench_pdf_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_rendering");

    for page_count in [1, 5, 20] {
        let doc = ofd2pdf::parse_bytes(&create_test_ofd(page_count)).unwrap();
        let options = ofd2pdf::ExportOptions::default();
        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| ofd2pdf::render::to_pdf(black_box(&doc), &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_parsing,
    bench_pdf_rendering,
);
criterion_main!(benches);
