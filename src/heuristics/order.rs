use super::{MARKER_THRESHOLD, ORDER_MARKERS, OrderRecord};
use regex::Regex;

const ITEMS_MARKER: &str = "🛍️ Cart Items";
const PAYMENT_MARKER: &str = "💳 Payment Method";

/// Count marker substrings and compare against the tuned threshold.
/// Pure; the threshold lives in the parent module so it can be tested
/// and tuned independently of extraction.
pub(super) fn classify(content: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    let matches = ORDER_MARKERS
        .iter()
        .filter(|marker| content.contains(*marker))
        .count();
    matches >= MARKER_THRESHOLD
}

/// Working copy of the record while lines are being scanned. Every slot is
/// optional until the mandatory-field check at the end.
#[derive(Default)]
struct Draft {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    location: Option<String>,
    street: Option<String>,
    city: Option<String>,
    phone1: Option<String>,
    phone2: Option<String>,
    payment_method: Option<String>,
    shipping_fees: Option<String>,
    promo_code: Option<String>,
    total_price: Option<String>,
    order_id: Option<String>,
    user_id: Option<String>,
}

type Setter = fn(&mut Draft, String);

/// Scalar field labels, scanned once per line. At most one slot is set per
/// line. The cart-items block spans multiple lines and is handled
/// separately in `extract_items`.
const FIELD_MARKERS: [(&str, Setter); 14] = [
    ("👤 First Name", |d, v| d.first_name = Some(v)),
    ("👤 Last Name", |d, v| d.last_name = Some(v)),
    ("📧 Email", |d, v| d.email = Some(v)),
    ("📍 Location", |d, v| d.location = Some(v)),
    ("🏠 Street Name", |d, v| d.street = Some(v)),
    ("🏙️ City", |d, v| d.city = Some(v)),
    ("📞 Phone Number 1", |d, v| d.phone1 = Some(v)),
    ("📞 Phone Number 2", |d, v| d.phone2 = Some(v)),
    ("💳 Payment Method", |d, v| d.payment_method = Some(v)),
    ("💰 Shipping Fees", |d, v| d.shipping_fees = Some(v)),
    ("🎟️ Promo Code Used", |d, v| d.promo_code = Some(v)),
    ("💰 Total Price", |d, v| d.total_price = Some(v)),
    ("🆔 Order ID", |d, v| d.order_id = Some(v)),
    ("👤 User ID", |d, v| d.user_id = Some(v)),
];

pub(super) fn extract(content: &str) -> Option<OrderRecord> {
    if content.is_empty() {
        return None;
    }

    let mut draft = Draft::default();
    for line in content.lines() {
        for (marker, set) in FIELD_MARKERS {
            if line.contains(marker) {
                if let Some(value) = line_value(line) {
                    set(&mut draft, value);
                }
                break;
            }
        }
    }

    let items = extract_items(content);

    let order_id = draft.order_id?;
    let first_name = draft.first_name?;

    Some(OrderRecord {
        order_id,
        first_name,
        last_name: draft.last_name,
        email: draft.email,
        location: draft.location,
        street: draft.street,
        city: draft.city,
        phone1: draft.phone1,
        phone2: draft.phone2,
        payment_method: draft.payment_method,
        shipping_fees: draft.shipping_fees,
        promo_code: draft.promo_code,
        total_price: draft.total_price,
        user_id: draft.user_id,
        items,
    })
}

/// Everything after the first `:` on the line, cleaned. Lines without a
/// colon, or with nothing but whitespace after it, leave the slot unset.
fn line_value(line: &str) -> Option<String> {
    let value = line.splitn(2, ':').nth(1).map(clean_text)?;
    (!value.is_empty()).then_some(value)
}

/// Collapse internal whitespace runs to single spaces and trim.
fn clean_text(text: &str) -> String {
    let re = Regex::new(r"\s+").unwrap();
    re.replace_all(text.trim(), " ").into_owned()
}

/// The cart block is the slice of the original blob between the items
/// label and the payment label, so item lines keep their source order.
/// Markdown emphasis characters are stripped; blank lines are discarded.
/// A missing anchor on either side yields an empty list.
fn extract_items(content: &str) -> Vec<String> {
    let Some(start) = content.find(ITEMS_MARKER) else {
        return Vec::new();
    };
    let Some(end) = content.find(PAYMENT_MARKER) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    let block = &content[start + ITEMS_MARKER.len()..end];
    let block = block.strip_prefix(':').unwrap_or(block);
    let markup = Regex::new("[*_~`]").unwrap();
    let block = markup.replace_all(block, "");

    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
