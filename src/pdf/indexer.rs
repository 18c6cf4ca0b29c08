//! PDF indexing using MuPDF
//!
//! Renders every page to a 2x PNG and extracts structured-text blocks into
//! the document's token map. Blocks with empty text are dropped here so the
//! resolver can assume every block carries matchable content.

use base64::Engine;
use mupdf::{Colorspace, Document, Matrix, TextPageOptions};
use thiserror::Error;

use super::types::{PageImage, PdfIndex, TextBlock, TokenMap};

/// Render scale for page images (2.0 = 144 DPI)
const RENDER_SCALE: f32 = 2.0;

/// PDF indexing errors
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Document has no pages")]
    EmptyDocument,
    #[error("Image encoding error: {0}")]
    ImageEncode(String),
    #[error("MuPDF error: {0}")]
    MuPdf(String),
}

impl From<mupdf::Error> for IndexError {
    fn from(e: mupdf::Error) -> Self {
        IndexError::MuPdf(e.to_string())
    }
}

/// Index a PDF: page images for display, text blocks for grounding.
pub fn index_pdf(pdf_bytes: &[u8]) -> Result<PdfIndex, IndexError> {
    let doc = Document::from_bytes(pdf_bytes, "application/pdf")?;
    let page_count = doc.page_count()? as usize;
    if page_count == 0 {
        return Err(IndexError::EmptyDocument);
    }

    let mut page_images = Vec::with_capacity(page_count);
    let mut token_map: TokenMap = Vec::new();

    for page_idx in 0..page_count {
        let page_number = (page_idx + 1) as u32;
        let page = doc.load_page(page_idx as i32)?;

        page_images.push(render_page_image(&page, page_number)?);
        collect_text_blocks(&page, page_number, &mut token_map)?;
    }

    Ok(PdfIndex {
        page_count: page_count as u32,
        page_images,
        token_map,
    })
}

/// Render one page to a base64 PNG at the fixed display scale.
fn render_page_image(page: &mupdf::Page, page_number: u32) -> Result<PageImage, IndexError> {
    let matrix = Matrix::new_scale(RENDER_SCALE, RENDER_SCALE);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;

    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let png_bytes = encode_pixmap_png(&pixmap)?;

    Ok(PageImage {
        page: page_number,
        width,
        height,
        image_base64: base64::engine::general_purpose::STANDARD.encode(png_bytes),
    })
}

/// Encode pixmap samples as PNG via the image crate.
fn encode_pixmap_png(pixmap: &mupdf::Pixmap) -> Result<Vec<u8>, IndexError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize; // components per pixel

    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    let img = image::RgbaImage::from_raw(width, height, rgba_buffer)
        .ok_or_else(|| IndexError::ImageEncode("Failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| IndexError::ImageEncode(e.to_string()))?;

    Ok(output)
}

/// Append this page's non-empty text blocks to the token map.
///
/// `block_index` restarts per page; the resolver only needs it for
/// round-tripping a match back to the UI.
fn collect_text_blocks(
    page: &mupdf::Page,
    page_number: u32,
    token_map: &mut TokenMap,
) -> Result<(), IndexError> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;

    for (block_index, block) in text_page.blocks().enumerate() {
        let bounds = block.bounds();

        let mut block_text = String::new();
        for line in block.lines() {
            let mut line_text = String::new();
            for ch in line.chars() {
                if let Some(c) = ch.char() {
                    line_text.push(c);
                }
            }
            if !block_text.is_empty() {
                block_text.push('\n');
            }
            block_text.push_str(&line_text);
        }

        let cleaned_text = block_text.trim();
        if cleaned_text.is_empty() {
            continue;
        }

        token_map.push(TextBlock {
            page: page_number,
            x0: bounds.x0,
            y0: bounds.y0,
            x1: bounds.x1,
            y1: bounds.y1,
            text: cleaned_text.to_string(),
            block_index: block_index as u32,
        });
    }

    Ok(())
}
