use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Document with `pages` pages, each carrying a `SourceIndex` entry that
/// holds its zero-based position
pub fn marked_pdf(pages: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for index in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 36.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "SourceIndex" => index as i64,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(200),
                Object::Integer(300),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn write_marked_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    marked_pdf(pages).save(&path).unwrap();
    path
}

/// `SourceIndex` of every page, in page order
pub fn page_markers(doc: &Document) -> Vec<i64> {
    let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
    pages.sort_by_key(|(num, _)| *num);
    pages
        .into_iter()
        .map(|(_, id)| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(b"SourceIndex"))
                .and_then(Object::as_i64)
                .unwrap()
        })
        .collect()
}

/// Produces a blank bitmap per page without needing PDFium
pub struct FakeRasterizer;

impl crate::pdf::Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        path: &Path,
        dpi: f32,
        on_page: &mut dyn FnMut(u32, image::DynamicImage) -> anyhow::Result<()>,
    ) -> anyhow::Result<u32> {
        let doc = crate::pdf::PdfDocument::open(path)?;
        let side = ((dpi / 72.0).round() as u32).max(1) * 4;
        for index in 0..doc.page_count() {
            on_page(index, image::DynamicImage::new_rgb8(side, side))?;
        }
        Ok(doc.page_count())
    }
}
