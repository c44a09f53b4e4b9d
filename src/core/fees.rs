use crate::domain::model::{FeeResult, Tariff};

/// Collection fee is this many reference resale values.
pub const COLLECTION_FEE_MULTIPLIER: f64 = 6.0;
pub const CUSTOMS_DUTY_RATE: f64 = 0.15;
pub const VAT_RATE: f64 = 0.12;

/// Computes the import fee chain for a catalog `amount` given in USD.
///
/// VAT is charged on local value plus duty plus collection fee, so it is
/// computed last from the other three figures.
pub fn compute_fees(amount: f64, usd_to_local_rate: f64, reference_resale_value: f64) -> FeeResult {
    let customs_collection_fee = reference_resale_value * COLLECTION_FEE_MULTIPLIER;
    let amount_local = amount * usd_to_local_rate;
    let customs_duty_fee = amount_local * CUSTOMS_DUTY_RATE;
    let vat_fee = (amount_local + customs_duty_fee + customs_collection_fee) * VAT_RATE;

    FeeResult {
        amount_local,
        customs_collection_fee,
        customs_duty_fee,
        vat_fee,
    }
}

pub fn compute_with_tariff(amount: f64, tariff: &Tariff) -> FeeResult {
    compute_fees(amount, tariff.usd_to_local_rate, tariff.reference_resale_value)
}

/// Delivery cost in local currency. Independent of the selected vehicle.
pub fn delivered_amount_local(delivered_amount: f64, usd_to_local_rate: f64) -> f64 {
    delivered_amount * usd_to_local_rate
}
