//! Power and torque gains for a tuning stage.

use serde::{Deserialize, Serialize};

use crate::data::Stage;

/// Absolute and relative gains of a stage over stock.
///
/// Percentages are rounded to one decimal place. A zero stock figure has no
/// meaningful percentage, so it is reported as `None` (`null` in JSON)
/// while the absolute gain is still given. Absolute gains saturate at the
/// `i64` bounds; percentages are computed in floating point and stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gains {
    pub hp: i64,
    pub nm: i64,
    pub hp_percent: Option<f64>,
    pub nm_percent: Option<f64>,
}

impl Gains {
    /// Gains of the stage's tuned figures over its stock figures
    pub fn for_stage(stage: &Stage) -> Self {
        Gains {
            hp: stage.tuned_hp.saturating_sub(stage.stock_hp),
            nm: stage.tuned_nm.saturating_sub(stage.stock_nm),
            hp_percent: percent(stage.tuned_hp, stage.stock_hp),
            nm_percent: percent(stage.tuned_nm, stage.stock_nm),
        }
    }
}

fn percent(tuned: i64, stock: i64) -> Option<f64> {
    if stock == 0 {
        return None;
    }
    let raw = (tuned as f64 - stock as f64) / stock as f64 * 100.0;
    Some((raw * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::stage;

    #[test]
    fn test_gains_for_stage() {
        let gains = Gains::for_stage(&stage("1", (600, 750), (720, 900)));
        assert_eq!(gains.hp, 120);
        assert_eq!(gains.nm, 150);
        assert_eq!(gains.hp_percent, Some(20.0));
        assert_eq!(gains.nm_percent, Some(20.0));
    }

    #[test]
    fn test_percent_rounds_to_one_decimal() {
        let gains = Gains::for_stage(&stage("1", (300, 450), (340, 520)));
        assert_eq!(gains.hp_percent, Some(13.3));
        assert_eq!(gains.nm_percent, Some(15.6));
    }

    #[test]
    fn test_negative_gain_not_clamped() {
        let gains = Gains::for_stage(&stage("eco", (200, 400), (180, 380)));
        assert_eq!(gains.hp, -20);
        assert_eq!(gains.nm, -20);
        assert_eq!(gains.hp_percent, Some(-10.0));
        assert_eq!(gains.nm_percent, Some(-5.0));
    }

    #[test]
    fn test_extreme_figures_do_not_overflow() {
        let gains = Gains::for_stage(&stage("1", (i64::MIN, 1), (1, 2)));
        assert_eq!(gains.hp, i64::MAX);
        assert_eq!(gains.hp_percent, Some(-100.0));
        assert_eq!(gains.nm, 1);

        let gains = Gains::for_stage(&stage("1", (i64::MAX, i64::MAX), (i64::MIN, 0)));
        assert_eq!(gains.hp, i64::MIN);
        assert_eq!(gains.nm, -i64::MAX);
        assert!(gains.hp_percent.unwrap().is_finite());
        assert_eq!(gains.nm_percent, Some(-100.0));
    }

    #[test]
    fn test_zero_stock_has_no_percentage() {
        let gains = Gains::for_stage(&stage("1", (0, 300), (50, 330)));
        assert_eq!(gains.hp, 50);
        assert_eq!(gains.hp_percent, None);
        assert_eq!(gains.nm_percent, Some(10.0));

        let json = serde_json::to_value(gains).unwrap();
        assert!(json["hpPercent"].is_null());
        assert_eq!(json["nmPercent"], 10.0);
    }
}
