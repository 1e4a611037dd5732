// Coarse price-action and volume trend classification.
use shared::models::{PriceTrend, VolumeTrend};

/// Bars between the two closes compared by [`price_action_trend`].
pub const PRICE_ACTION_LOOKBACK: usize = 5;
/// Relative move beyond which price action counts as trending.
pub const PRICE_ACTION_THRESHOLD: f64 = 0.01;
/// Bars per block compared by [`volume_trend`].
pub const VOLUME_BLOCK: usize = 5;
/// Relative change in mean volume beyond which volume counts as moving.
pub const VOLUME_THRESHOLD: f64 = 0.20;

/// Latest close against the close `PRICE_ACTION_LOOKBACK` bars earlier.
pub fn price_action_trend(closes: &[f64]) -> Option<PriceTrend> {
    if closes.len() <= PRICE_ACTION_LOOKBACK {
        return None;
    }
    let latest = closes[closes.len() - 1];
    let reference = closes[closes.len() - 1 - PRICE_ACTION_LOOKBACK];
    if reference == 0.0 {
        return Some(PriceTrend::Sideways);
    }

    let change = (latest - reference) / reference;
    let trend = if change > PRICE_ACTION_THRESHOLD {
        PriceTrend::Uptrend
    } else if change < -PRICE_ACTION_THRESHOLD {
        PriceTrend::Downtrend
    } else {
        PriceTrend::Sideways
    };
    Some(trend)
}

/// Mean of the last `VOLUME_BLOCK` volumes against the block before it.
pub fn volume_trend(volumes: &[f64]) -> Option<VolumeTrend> {
    if volumes.len() < 2 * VOLUME_BLOCK {
        return None;
    }
    let n = volumes.len();
    let mean = |s: &[f64]| s.iter().sum::<f64>() / s.len() as f64;
    let recent = mean(&volumes[n - VOLUME_BLOCK..]);
    let previous = mean(&volumes[n - 2 * VOLUME_BLOCK..n - VOLUME_BLOCK]);

    if previous == 0.0 {
        return Some(if recent > 0.0 { VolumeTrend::Up } else { VolumeTrend::Stable });
    }

    let trend = if recent > previous * (1.0 + VOLUME_THRESHOLD) {
        VolumeTrend::Up
    } else if recent < previous * (1.0 - VOLUME_THRESHOLD) {
        VolumeTrend::Down
    } else {
        VolumeTrend::Stable
    };
    Some(trend)
}
