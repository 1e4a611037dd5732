// Support / resistance from a trailing window of closes.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Lowest and highest of the last `window` closes.
pub fn support_resistance(closes: &[f64], window: usize) -> Option<SupportResistance> {
    if window == 0 || closes.len() < window {
        return None;
    }
    let tail = &closes[closes.len() - window..];
    let support = tail.iter().copied().fold(f64::INFINITY, f64::min);
    let resistance = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(SupportResistance { support, resistance })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_resistance_uses_trailing_window() {
        let closes = [1.0, 50.0, 10.0, 12.0, 9.0, 11.0];
        let levels = support_resistance(&closes, 4).unwrap();
        assert_eq!(levels.support, 9.0);
        assert_eq!(levels.resistance, 12.0);
    }

    #[test]
    fn test_support_resistance_whole_series() {
        let levels = support_resistance(&[3.0, 1.0, 2.0], 3).unwrap();
        assert_eq!(levels, SupportResistance { support: 1.0, resistance: 3.0 });
    }

    #[test]
    fn test_support_resistance_insufficient() {
        assert_eq!(support_resistance(&[1.0, 2.0], 3), None);
        assert_eq!(support_resistance(&[1.0, 2.0], 0), None);
    }
}
