use super::pack::{Pack, PackUnit};

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Price per litre, per kilogram or per piece. `None` when it cannot be derived.
pub fn per_unit(price: f64, pack: &Pack) -> Option<f64> {
    if !price.is_finite() || price == 0.0 {
        return None;
    }
    let qty = f64::from(pack.qty.filter(|q| *q > 0)?);
    let value = match pack.unit {
        Some(PackUnit::Pcs) => round2(price / qty),
        _ => {
            let base_qty = qty / 1000.0;
            if base_qty <= 0.0 {
                return None;
            }
            round2(price / base_qty)
        }
    };
    value.is_finite().then_some(value)
}
