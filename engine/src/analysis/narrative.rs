// Human-readable explanation of an analysis, one line per topic.
use crate::analysis::config::AnalysisConfig;
use crate::analysis::signal::SignalDecision;
use shared::models::{IndicatorSet, PriceTrend, VolumeTrend};
use shared::utils::{format_optional, format_price, format_sltp};

/// Lines in fixed order: EMA, RSI, MA, MACD, price action, volume, summary.
pub fn build_narrative(
    config: &AnalysisConfig,
    indicators: &IndicatorSet,
    price_action: PriceTrend,
    volume_trend: VolumeTrend,
    decision: &SignalDecision,
    strategy: &str,
) -> Vec<String> {
    let fast = format!("EMA{}", config.ema_fast_period);
    let slow = format!("EMA{}", config.ema_slow_period);

    let ema_line = match (indicators.ema_fast, indicators.ema_slow) {
        (Some(f), Some(s)) if f > s => format!("{} above {} ({} > {}), bullish", fast, slow, format_price(f), format_price(s)),
        (Some(f), Some(s)) if f < s => format!("{} below {} ({} < {}), bearish", fast, slow, format_price(f), format_price(s)),
        (Some(f), Some(_)) => format!("{} and {} flat at {}", fast, slow, format_price(f)),
        _ => format!("{}/{}: -", fast, slow),
    };

    let rsi_line = match indicators.rsi {
        Some(r) => format!(
            "RSI({}): {} ({})",
            config.rsi_period,
            format_price(r),
            config.rsi_thresholds.label(r)
        ),
        None => format!("RSI({}): -", config.rsi_period),
    };

    let ma_line = format!("MA{}: {}", config.sma_period, format_optional(indicators.sma));

    let macd_line = match indicators.macd.histogram {
        Some(h) if h > 0.0 => format!("MACD: Bullish (histogram {})", format_price(h)),
        Some(h) => format!("MACD: Bearish (histogram {})", format_price(h)),
        None => "MACD: n/a".to_string(),
    };

    let summary = format!(
        "Signal {} via {}: {}. Position {}, {}",
        decision.signal,
        strategy,
        decision.reason,
        decision.open_position,
        format_sltp(decision.stop_loss_take_profit.as_ref())
    );

    vec![
        ema_line,
        rsi_line,
        ma_line,
        macd_line,
        format!("Price Action: {}", price_action),
        format!("Volume: {}", volume_trend),
        summary,
    ]
}
