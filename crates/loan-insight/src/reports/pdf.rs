use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use super::export::{report_lines, LineStyle, ReportError, ReportOwner};
use crate::predictions::domain::PredictionRecord;

// US letter, half-inch margins.
const PAGE_WIDTH: Mm = Mm(215.9);
const PAGE_HEIGHT: Mm = Mm(279.4);
const MARGIN: f32 = 12.7;
const LAYER: &str = "Report";

struct Fonts {
    title: IndirectFontRef,
    body: IndirectFontRef,
    footer: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, ReportError> {
        Ok(Self {
            title: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
            body: doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?,
            footer: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(pdf_error)?,
        })
    }

    /// Font, size in points, and the vertical advance in millimetres.
    fn for_style(&self, style: LineStyle) -> (&IndirectFontRef, f32, f32) {
        match style {
            LineStyle::Title => (&self.title, 20.0, 11.0),
            LineStyle::Heading => (&self.title, 14.0, 8.0),
            LineStyle::Body | LineStyle::Blank => (&self.body, 10.0, 5.0),
            LineStyle::Footer => (&self.footer, 9.0, 5.0),
        }
    }
}

/// PDF rendition of the printable report, paginated on letter paper.
///
/// The built-in PDF fonts have no rupee glyph, so amounts are written with an `Rs.` prefix.
pub fn render_pdf_report(
    records: &[PredictionRecord],
    owner: &ReportOwner,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let lines = report_lines(records, owner, generated_at)?;

    let (doc, page, layer) =
        PdfDocument::new("Loan Prediction Report", PAGE_WIDTH, PAGE_HEIGHT, LAYER);
    let fonts = Fonts::load(&doc)?;
    let mut current = doc.get_page(page).get_layer(layer);
    let mut cursor = PAGE_HEIGHT.0 - MARGIN;

    for line in lines {
        let (font, size, advance) = fonts.for_style(line.style);
        if cursor - advance < MARGIN {
            let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER);
            current = doc.get_page(page).get_layer(layer);
            cursor = PAGE_HEIGHT.0 - MARGIN;
        }
        cursor -= advance;
        if line.style != LineStyle::Blank {
            current.use_text(
                line.text.replace('₹', "Rs. "),
                size,
                Mm(MARGIN),
                Mm(cursor),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(err: printpdf::Error) -> ReportError {
    ReportError::Pdf(err.to_string())
}
