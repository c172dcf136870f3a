//! HTML serializers
//!
//! Flattens a document to the paragraph-per-block HTML used by the print view
//! and the Word export. Formatting is sampled at offset 0 of each block, so a
//! partially bold paragraph is exported either fully bold or not at all.
//! Block types and alignment do not reach the output.

use std::fmt::Write as _;

use richkit_core::{Block, BlockType, Document, EntityType, InlineStyle};
use richkit_settings::PrintSettings;

const IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// Styles with a CSS rendering, in output order
const CSS_STYLES: [InlineStyle; 3] = [
    InlineStyle::Bold,
    InlineStyle::Italic,
    InlineStyle::Underline,
];

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    // Writing into a String cannot fail
    let _ = pulldown_cmark_escape::escape_html(&mut escaped, text);
    escaped
}

/// Escape a URL for a double-quoted `src` or `href` attribute
pub fn escape_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    let _ = pulldown_cmark_escape::escape_href(&mut escaped, url);
    escaped
}

/// CSS declarations for the styles at the first character of `block`
fn block_style(block: &Block) -> String {
    let styles = block.style_at(0);
    CSS_STYLES
        .iter()
        .filter(|style| styles.contains(*style))
        .filter_map(InlineStyle::css)
        .collect()
}

fn image_src<'a>(doc: &'a Document, block: &Block) -> Option<&'a str> {
    if block.block_type() != BlockType::Atomic {
        return None;
    }
    let entity = doc.get_entity(block.entity_at(0)?).ok()?;
    if entity.entity_type != EntityType::Image {
        return None;
    }
    entity.src()
}

/// One `<p>` per block, in document order
pub fn blocks_to_html(doc: &Document) -> String {
    let mut html = String::new();
    for block in doc.blocks() {
        match image_src(doc, block) {
            Some(src) => {
                let _ = write!(
                    html,
                    "<p><img src=\"{}\" style=\"{}\" /></p>",
                    escape_url(src),
                    IMAGE_STYLE
                );
            }
            None => {
                let _ = write!(
                    html,
                    "<p style=\"{}\">{}</p>",
                    block_style(block),
                    escape_html(block.text())
                );
            }
        }
    }
    html
}

/// Standalone page for the print view
pub fn to_print_html(doc: &Document) -> String {
    to_print_html_with(doc, &PrintSettings::default())
}

pub fn to_print_html_with(doc: &Document, settings: &PrintSettings) -> String {
    format!(
        "<html>\n\
         <head>\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: {font}; line-height: {line_height}; margin: {margin}px; }}\n\
         img {{ max-width: 100%; height: auto; }}\n\
         @media print {{ body {{ margin: 0; padding: {margin}px; }} }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = escape_html(&settings.title),
        font = settings.font_family,
        line_height = settings.line_height,
        margin = settings.margin_px,
        body = blocks_to_html(doc),
    )
}

/// Word-compatible HTML document
pub fn to_export_html(doc: &Document) -> String {
    format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Document</title>\n\
         <style>\n\
         img {{ max-width: 100%; height: auto; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        body = blocks_to_html(doc),
    )
}
