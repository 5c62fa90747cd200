#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use zip::write::FileOptions;

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="png" ContentType="image/png"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#;

pub fn opaque_png(w: u32, h: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })),
        ImageFormat::Png,
    )
}

pub fn transparent_png(w: u32, h: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]))),
        ImageFormat::Png,
    )
}

pub fn opaque(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 120, 30]))),
        format,
    )
}

/// RGBA pixels that are all fully opaque.
pub fn opaque_rgba(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([200, 40, 90, 255]))),
        format,
    )
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Minimal word-processing package with one image relationship per media file.
pub struct DocxBuilder {
    media: Vec<(String, Vec<u8>)>,
    with_rels: bool,
    with_media_dir: bool,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self {
            media: Vec::new(),
            with_rels: true,
            with_media_dir: true,
        }
    }

    pub fn media(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.media.push((name.to_string(), bytes));
        self
    }

    pub fn without_rels(mut self) -> Self {
        self.with_rels = false;
        self
    }

    pub fn without_media_dir(mut self) -> Self {
        self.with_media_dir = false;
        self
    }

    pub fn document_rels(&self) -> String {
        let mut s = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (name, _)) in self.media.iter().enumerate() {
            s.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
                i + 10,
                name
            ));
        }
        s.push_str("</Relationships>");
        s
    }

    pub fn write(&self, path: &Path) {
        let mut zw = zip::ZipWriter::new(File::create(path).unwrap());
        let opts = FileOptions::default();
        let mut put = |name: &str, data: &[u8]| {
            zw.start_file(name, opts).unwrap();
            zw.write_all(data).unwrap();
        };
        put("[Content_Types].xml", CONTENT_TYPES.as_bytes());
        put("_rels/.rels", ROOT_RELS.as_bytes());
        put("word/document.xml", DOCUMENT.as_bytes());
        if self.with_rels {
            put("word/_rels/document.xml.rels", self.document_rels().as_bytes());
        }
        if self.with_media_dir {
            for (name, bytes) in &self.media {
                put(&format!("word/media/{name}"), bytes);
            }
        }
        zw.finish().unwrap();
    }
}

pub fn entry_names(path: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    names
}

pub fn read_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

pub fn read_entry_string(path: &Path, name: &str) -> String {
    String::from_utf8(read_entry(path, name)).unwrap()
}

/// Width and height from the baseline SOF0 segment.
pub fn jpeg_dimensions(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "not a JPEG stream");
    let mut i = 2;
    while i + 9 < bytes.len() {
        assert_eq!(bytes[i], 0xFF, "lost marker sync at {i}");
        let marker = bytes[i + 1];
        let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if marker == 0xC0 {
            let h = u16::from_be_bytes([bytes[i + 5], bytes[i + 6]]) as u32;
            let w = u16::from_be_bytes([bytes[i + 7], bytes[i + 8]]) as u32;
            return (w, h);
        }
        i += 2 + len;
    }
    panic!("no SOF0 segment");
}

/// Every `Target="media/..."` value in a descriptor.
pub fn media_targets(rels: &str) -> Vec<String> {
    rels.split("Target=\"")
        .skip(1)
        .filter_map(|s| s.split('"').next())
        .filter(|t| t.starts_with("media/"))
        .map(str::to_string)
        .collect()
}

pub fn dir_is_empty(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut it| it.next().is_none())
        .unwrap_or(true)
}
