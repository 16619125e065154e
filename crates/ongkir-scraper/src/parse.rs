//! Extraction of route labels and tariff rows from a carrier quote page.
//!
//! ## Observed page shape
//!
//! Route summary, one block per side; the `h6` caption is Indonesian
//! (`Dari` = from, `Tujuan` = to):
//! ```text
//! <div class="box-tujuan">
//!   <div class="box-tujuan__list"><h6>Dari</h6><p>JAKARTA</p></div>
//!   <div class="box-tujuan__list"><h6>Tujuan</h6><p>BANDUNG</p></div>
//! </div>
//! ```
//!
//! Fee table, one row per service, cells in the order service name,
//! shipment type, fee, estimated delivery:
//! ```text
//! <div class="wrap-table"><table><tbody>
//!   <tr><td>REG</td><td>Document/Paket</td><td>Rp 10.000</td><td>1-2 Days</td></tr>
//! </tbody></table></div>
//! ```

use std::sync::LazyLock;

use ongkir_core::TariffEntry;
use scraper::{ElementRef, Html, Selector};

const ORIGIN_CAPTION: &str = "Dari";
const DESTINATION_CAPTION: &str = "Tujuan";

static ROUTE_BOX: LazyLock<Selector> = LazyLock::new(|| selector("div.box-tujuan"));
static ROUTE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.box-tujuan__list"));
static CAPTION: LazyLock<Selector> = LazyLock::new(|| selector("h6"));
static VALUE: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static FEE_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("div.wrap-table"));
static FEE_ROW: LazyLock<Selector> =
    LazyLock::new(|| selector("div.wrap-table table tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector is valid")
}

/// Structured content of one quote page.
///
/// Labels are empty strings when the page did not carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeePage {
    pub origin_label: String,
    pub destination_label: String,
    pub tariff: Vec<TariffEntry>,
}

impl FeePage {
    #[must_use]
    pub fn has_labels(&self) -> bool {
        !self.origin_label.is_empty() && !self.destination_label.is_empty()
    }
}

/// Parses a quote page.
///
/// Returns `None` when the document has neither the route summary nor the fee
/// table, i.e. the carrier served something other than a quote page.
#[must_use]
pub fn parse_fee_page(html: &str) -> Option<FeePage> {
    let document = Html::parse_document(html);

    let has_route_box = document.select(&ROUTE_BOX).next().is_some();
    let has_fee_table = document.select(&FEE_TABLE).next().is_some();
    if !has_route_box && !has_fee_table {
        return None;
    }

    let mut page = FeePage::default();

    for route_box in document.select(&ROUTE_BOX) {
        for item in route_box.select(&ROUTE_ITEM) {
            let caption = child_text(&item, &CAPTION);
            let value = child_text(&item, &VALUE);
            match caption.as_str() {
                ORIGIN_CAPTION => page.origin_label = value,
                DESTINATION_CAPTION => page.destination_label = value,
                _ => {}
            }
        }
    }

    page.tariff = document.select(&FEE_ROW).map(|row| parse_row(&row)).collect();

    Some(page)
}

fn parse_row(row: &ElementRef<'_>) -> TariffEntry {
    let cells: Vec<String> = row.select(&CELL).map(|cell| element_text(&cell)).collect();
    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    TariffEntry {
        service_name: cell(0),
        shipment_type: cell(1),
        fee: cell(2),
        etd: cell(3),
    }
}

/// Concatenated, trimmed text of every descendant matching `sel`.
fn child_text(element: &ElementRef<'_>, sel: &Selector) -> String {
    let joined: String = element
        .select(sel)
        .flat_map(|child| child.text())
        .collect();
    joined.trim().to_string()
}

fn element_text(element: &ElementRef<'_>) -> String {
    let joined: String = element.text().collect();
    joined.trim().to_string()
}
