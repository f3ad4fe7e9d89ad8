//! Invoice layout.
//!
//! Fixed A4 layout: shop header, invoice number/date, client and vehicle
//! blocks, the line-item table (continued on new pages as needed) and the
//! totals block. Coordinates are in millimetres from the bottom-left corner.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use rust_decimal::Decimal;

use crate::config::ShopSettings;
use crate::domain::QuotationTotals;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const BOTTOM: f32 = 25.0;

const COL_QTY: f32 = 120.0;
const COL_UNIT_RIGHT: f32 = 160.0;
const COL_TOTAL_RIGHT: f32 = PAGE_WIDTH - MARGIN;
const DESCRIPTION_CHARS: usize = 60;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
#[error("invoice rendering failed: {0}")]
pub struct PdfError(String);

impl From<printpdf::Error> for PdfError {
    fn from(e: printpdf::Error) -> Self {
        PdfError(e.to_string())
    }
}

/// Everything printed on an invoice, already resolved from the store.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub number: String,
    pub issued_on: String,
    pub state_label: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub client_document: String,
    pub vehicle_plate: String,
    pub vehicle_description: String,
    pub lines: Vec<InvoiceLine>,
    pub apply_tax: bool,
    pub totals: QuotationTotals,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Writes top to bottom, starting a new page when the bottom margin is hit.
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor<'_> {
    fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn text_right(&self, text: &str, size: f32, right: f32, font: &IndirectFontRef) {
        self.text(text, size, right - approx_width(text, size), font);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    /// Move down; returns true when a new page was started.
    fn advance(&mut self, mm: f32) -> bool {
        self.y -= mm;
        if self.y < BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
            return true;
        }
        false
    }
}

/// Render an invoice to PDF bytes.
pub fn render_invoice(invoice: &InvoiceDocument, shop: &ShopSettings) -> Result<Vec<u8>, PdfError> {
    let title = format!("Invoice {}", invoice.number);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    {
        let mut cursor = Cursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: PAGE_HEIGHT - MARGIN,
        };

        draw_header(&mut cursor, &fonts, invoice, shop);
        draw_parties(&mut cursor, &fonts, invoice);
        draw_lines(&mut cursor, &fonts, invoice);
        draw_totals(&mut cursor, &fonts, invoice);
    }

    Ok(doc.save_to_bytes()?)
}

fn draw_header(cursor: &mut Cursor<'_>, fonts: &Fonts, invoice: &InvoiceDocument, shop: &ShopSettings) {
    cursor.text(&shop.name, 18.0, MARGIN, &fonts.bold);
    cursor.text_right("INVOICE", 18.0, COL_TOTAL_RIGHT, &fonts.bold);
    cursor.advance(7.0);

    for detail in [&shop.address, &shop.phone, &shop.email] {
        if !detail.is_empty() {
            cursor.text(detail, 9.0, MARGIN, &fonts.regular);
            cursor.advance(4.5);
        }
    }

    cursor.text_right(&format!("No. {}", invoice.number), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
    cursor.advance(4.5);
    cursor.text_right(&format!("Date: {}", invoice.issued_on), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
    cursor.advance(4.5);
    cursor.text_right(&format!("Status: {}", invoice.state_label), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
    cursor.advance(6.0);
    cursor.rule();
    cursor.advance(8.0);
}

fn draw_parties(cursor: &mut Cursor<'_>, fonts: &Fonts, invoice: &InvoiceDocument) {
    const RIGHT_COLUMN: f32 = 110.0;

    cursor.text("CLIENT", 10.0, MARGIN, &fonts.bold);
    cursor.text("VEHICLE", 10.0, RIGHT_COLUMN, &fonts.bold);
    cursor.advance(5.5);

    let client = [
        invoice.client_name.as_str(),
        invoice.client_document.as_str(),
        invoice.client_phone.as_str(),
        invoice.client_email.as_str(),
    ];
    let plate = format!("Plate: {}", invoice.vehicle_plate);
    let vehicle = [plate.as_str(), invoice.vehicle_description.as_str()];

    for row in 0..client.len().max(vehicle.len()) {
        if let Some(text) = client.get(row).filter(|t| !t.is_empty()) {
            cursor.text(text, 10.0, MARGIN, &fonts.regular);
        }
        if let Some(text) = vehicle.get(row).filter(|t| !t.is_empty()) {
            cursor.text(text, 10.0, RIGHT_COLUMN, &fonts.regular);
        }
        cursor.advance(5.0);
    }
    cursor.advance(5.0);
}

fn draw_table_header(cursor: &mut Cursor<'_>, fonts: &Fonts) {
    cursor.text("Description", 10.0, MARGIN, &fonts.bold);
    cursor.text("Qty", 10.0, COL_QTY, &fonts.bold);
    cursor.text_right("Unit price", 10.0, COL_UNIT_RIGHT, &fonts.bold);
    cursor.text_right("Amount", 10.0, COL_TOTAL_RIGHT, &fonts.bold);
    cursor.advance(2.5);
    cursor.rule();
    cursor.advance(5.5);
}

fn draw_lines(cursor: &mut Cursor<'_>, fonts: &Fonts, invoice: &InvoiceDocument) {
    draw_table_header(cursor, fonts);

    if invoice.lines.is_empty() {
        cursor.text("No services quoted.", 10.0, MARGIN, &fonts.regular);
        cursor.advance(6.0);
    }

    for line in &invoice.lines {
        cursor.text(&truncate(&line.description, DESCRIPTION_CHARS), 10.0, MARGIN, &fonts.regular);
        cursor.text(&line.quantity.normalize().to_string(), 10.0, COL_QTY, &fonts.regular);
        cursor.text_right(&money(line.unit_price), 10.0, COL_UNIT_RIGHT, &fonts.regular);
        cursor.text_right(&money(line.total), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
        if cursor.advance(6.0) {
            draw_table_header(cursor, fonts);
        }
    }

    cursor.rule();
    cursor.advance(7.0);
}

fn draw_totals(cursor: &mut Cursor<'_>, fonts: &Fonts, invoice: &InvoiceDocument) {
    const LABEL_X: f32 = 125.0;

    cursor.text("Subtotal", 10.0, LABEL_X, &fonts.regular);
    cursor.text_right(&money(invoice.totals.subtotal), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
    cursor.advance(5.5);

    if invoice.apply_tax {
        cursor.text("VAT (19%)", 10.0, LABEL_X, &fonts.regular);
        cursor.text_right(&money(invoice.totals.tax), 10.0, COL_TOTAL_RIGHT, &fonts.regular);
        cursor.advance(5.5);
    }

    cursor.text("TOTAL", 12.0, LABEL_X, &fonts.bold);
    cursor.text_right(&money(invoice.totals.total), 12.0, COL_TOTAL_RIGHT, &fonts.bold);
    cursor.advance(10.0);

    if let Some(notes) = invoice.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        cursor.text("Notes", 10.0, MARGIN, &fonts.bold);
        cursor.advance(5.0);
        for chunk in wrap(notes, 95) {
            cursor.text(&chunk, 9.0, MARGIN, &fonts.regular);
            cursor.advance(4.5);
        }
    }
}

/// Rough Helvetica advance width in millimetres (0.556 em per glyph).
fn approx_width(text: &str, size_pt: f32) -> f32 {
    const PT_TO_MM: f32 = 0.3528;
    text.chars().count() as f32 * size_pt * 0.556 * PT_TO_MM
}

/// `$ 1,234,567.89`
fn money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}$ {}.{}", sign, grouped, cents)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
