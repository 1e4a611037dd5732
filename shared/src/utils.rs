// Display helpers shared by anything that renders an analysis.
use crate::models::StopLossTakeProfit;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

/// Optional values render as "-" when undefined.
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_price).unwrap_or_else(|| "-".to_string())
}

pub fn format_sltp(levels: Option<&StopLossTakeProfit>) -> String {
    match levels {
        Some(l) => format!("SL: {} / TP: {}", format_price(l.stop_loss), format_price(l.take_profit)),
        None => "-".to_string(),
    }
}
