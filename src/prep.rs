use crate::dataset::RetailRecord;
use tracing::info;

/// Cleaning pass over the raw export, mirroring the standard prep for this
/// dataset: drop cancelled invoices (invoice ids carrying a 'C'), drop
/// non-positive quantities and prices, then clip Quantity and Price to the
/// 1st/99th-percentile outlier fences. Clipping happens before the encoder
/// binarizes quantities.
pub fn prepare(records: Vec<RetailRecord>) -> Vec<RetailRecord> {
    let before = records.len();
    let mut records: Vec<RetailRecord> = records
        .into_iter()
        .filter(|r| !r.invoice.contains('C'))
        .filter(|r| r.quantity > 0.0 && r.price > 0.0)
        .collect();
    info!(
        kept = records.len(),
        dropped = before - records.len(),
        "filtered cancelled and non-positive rows"
    );

    clip_outliers(&mut records, |r| &mut r.quantity);
    clip_outliers(&mut records, |r| &mut r.price);
    records
}

pub fn filter_country(records: &[RetailRecord], country: &str) -> Vec<RetailRecord> {
    records
        .iter()
        .filter(|r| r.country == country)
        .cloned()
        .collect()
}

/// The dataset keys baskets by stock code; this resolves a code back to a
/// product description for display.
pub fn description_of<'a>(records: &'a [RetailRecord], stock_code: &str) -> Option<&'a str> {
    records
        .iter()
        .find(|r| r.stock_code == stock_code)
        .map(|r| r.description.as_str())
}

fn clip_outliers<F>(records: &mut [RetailRecord], mut field: F)
where
    F: FnMut(&mut RetailRecord) -> &mut f64,
{
    if records.is_empty() {
        return;
    }
    let mut values: Vec<f64> = records.iter_mut().map(|r| *field(r)).collect();
    values.sort_by(f64::total_cmp);
    let (low_limit, up_limit) = outlier_fences(&values);
    for record in records.iter_mut() {
        let value = field(record);
        if *value < low_limit {
            *value = low_limit;
        } else if *value > up_limit {
            *value = up_limit;
        }
    }
}

// 1st/99th percentiles widened by 1.5x their spread. Deliberately not the
// textbook quartile fence; the retail quantities are so skewed that a
// 25th/75th fence would clip legitimate wholesale orders.
fn outlier_fences(sorted: &[f64]) -> (f64, f64) {
    let q1 = quantile(sorted, 0.01);
    let q3 = quantile(sorted, 0.99);
    let interquantile_range = q3 - q1;
    let up_limit = q3 + 1.5 * interquantile_range;
    let low_limit = q1 - 1.5 * interquantile_range;
    (low_limit, up_limit)
}

// Linear-interpolation quantile over a sorted slice, matching pandas'
// default method.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    if below == above {
        return sorted[below];
    }
    let fraction = position - below as f64;
    sorted[below] + fraction * (sorted[above] - sorted[below])
}
