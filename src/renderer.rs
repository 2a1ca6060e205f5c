use docx_rs::{AlignmentType, Docx, PageMargin, Paragraph, Pic, Run, RunFonts};
use std::io::Cursor;
use tracing::warn;

use crate::error::RenderError;
use crate::heuristics::OrderRecord;
use crate::qr;

const NA: &str = "N/A";

const BODY_FONT: &str = "Arial";
const TITLE_FONT: &str = "Arial Black";

// Run sizes are half-points.
const TITLE_SIZE: usize = 36;
const ORDER_ID_SIZE: usize = 24;
const SECTION_SIZE: usize = 22;
const DETAIL_SIZE: usize = 20;
const URL_SIZE: usize = 21;
const THANKS_SIZE: usize = 24;

/// Page margin in twentieths of a point.
const PAGE_MARGIN: i32 = 1000;

/// Edge of the embedded QR image: 150 px at 9525 EMU per pixel.
const QR_EDGE_EMU: u32 = 150 * 9525;

/// Assemble the fixed-layout receipt for one order and serialize it to
/// `.docx` bytes.
///
/// Missing optional fields render as `"N/A"`, never blank, so the layout
/// stays visually stable. The only failure mode is document serialization;
/// a degraded QR encode merely omits the image block. Identical input
/// yields byte-identical output.
pub fn render(record: &OrderRecord, qr_url: &str) -> Result<Vec<u8>, RenderError> {
    let qr_png = qr::encode(qr_url);
    if qr_png.is_none() {
        warn!(order_id = %record.order_id, "Rendering receipt without a scannable code");
    }

    let mut children: Vec<Paragraph> = Vec::new();

    children.push(styled("ORDER RECEIPT", TITLE_SIZE, TITLE_FONT, true).align(AlignmentType::Center));
    children.push(spacer());
    children.push(
        styled(
            &format!("Order ID: {}", record.order_id),
            ORDER_ID_SIZE,
            BODY_FONT,
            true,
        )
        .align(AlignmentType::Center),
    );
    children.push(spacer());

    children.push(styled("CUSTOMER DETAILS", SECTION_SIZE, BODY_FONT, true));
    for line in customer_lines(record) {
        children.push(styled(&line, DETAIL_SIZE, BODY_FONT, false));
    }
    children.push(spacer());

    children.push(styled("ORDER SUMMARY", SECTION_SIZE, BODY_FONT, true));
    for item in item_lines(&record.items) {
        children.push(styled(&item, SECTION_SIZE, BODY_FONT, false));
    }
    children.push(spacer());
    children.push(styled(
        &format!("💳 Payment: {}", opt(&record.payment_method)),
        DETAIL_SIZE,
        BODY_FONT,
        false,
    ));
    children.push(styled(
        &format!("🚚 Shipping: {}", opt(&record.shipping_fees)),
        DETAIL_SIZE,
        BODY_FONT,
        false,
    ));
    children.push(styled(
        &format!("💰 Total: {}", opt(&record.total_price)),
        SECTION_SIZE,
        BODY_FONT,
        true,
    ));
    children.push(spacer());

    if let Some(png) = &qr_png {
        let mut pic = Pic::new(png).size(QR_EDGE_EMU, QR_EDGE_EMU);
        pic.id = "rIdImage1".to_string();
        children.push(
            Paragraph::new()
                .add_run(Run::new().add_image(pic))
                .align(AlignmentType::Center),
        );
    }

    children.push(styled(qr_url, URL_SIZE, BODY_FONT, false).align(AlignmentType::Center));
    children.push(
        styled("Thank you for your order!", THANKS_SIZE, BODY_FONT, true)
            .align(AlignmentType::Center),
    );

    // The library assigns paragraph ids from a process-global counter,
    // which would make two renders of the same record differ byte-wise.
    for (i, paragraph) in children.iter_mut().enumerate() {
        paragraph.id = format!("{:08x}", i + 1);
    }

    let mut doc = Docx::new().page_margin(
        PageMargin::new()
            .top(PAGE_MARGIN)
            .right(PAGE_MARGIN)
            .bottom(PAGE_MARGIN)
            .left(PAGE_MARGIN),
    );
    for paragraph in children {
        doc = doc.add_paragraph(paragraph);
    }

    let mut cursor = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut cursor)
        .map_err(|e| RenderError::Document(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn styled(text: &str, size: usize, font: &str, bold: bool) -> Paragraph {
    let mut run = Run::new()
        .add_text(text)
        .size(size)
        .fonts(RunFonts::new().ascii(font));
    if bold {
        run = run.bold();
    }
    Paragraph::new().add_run(run)
}

fn spacer() -> Paragraph {
    Paragraph::new()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NA)
}

/// Customer-details lines, one per glyph, in layout order.
fn customer_lines(record: &OrderRecord) -> Vec<String> {
    let name = match &record.last_name {
        Some(last) => format!("👤 {} {}", record.first_name, last),
        None => format!("👤 {}", record.first_name),
    };
    let phone = match &record.phone2 {
        Some(phone2) if phone2 != NA => format!("{} / {}", opt(&record.phone1), phone2),
        _ => opt(&record.phone1).to_string(),
    };
    vec![
        name,
        format!("📧 {}", opt(&record.email)),
        format!("📞 {}", phone),
        format!("📍 {}, {}", opt(&record.street), opt(&record.city)),
        format!("🌍 {}", opt(&record.location)),
    ]
}

/// Cart lines for the summary section. An existing leading bullet is kept
/// verbatim, otherwise one is prepended. An empty cart still renders one
/// placeholder line.
fn item_lines(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec![format!("• {NA}")];
    }
    items
        .iter()
        .map(|item| {
            if item.starts_with('•') {
                item.clone()
            } else {
                format!("• {}", item.trim())
            }
        })
        .collect()
}
