//! Current-state scoring for a single dimension.
//!
//! A dimension's CSS is the mean percentile of its indicators across all
//! categories. Dimensions assessed without indicator detail keep their
//! reported health score.

use crate::core::{DimensionResult, Score0To100};

/// Compute a dimension's current-state score from its indicators.
///
/// Falls back to the reported `health_score` when the dimension carries no
/// indicators; an empty mean is not a zero-health team.
pub fn dimension_css(dimension: &DimensionResult) -> Score0To100 {
    let percentiles: Vec<f64> = dimension
        .indicators()
        .map(|i| i.percentile.value())
        .collect();
    if percentiles.is_empty() {
        return dimension.health_score;
    }
    Score0To100::new(crate::core::metrics::mean(&percentiles))
}

/// Return the dimension with its `css_score` filled in.
pub fn with_css(mut dimension: DimensionResult) -> DimensionResult {
    dimension.css_score = Some(dimension_css(&dimension));
    dimension
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Indicator, IndicatorCategory, Percentile, Trend};

    fn indicator(percentile: f64) -> Indicator {
        Indicator {
            id: "i".to_string(),
            value: 0.0,
            display_value: String::new(),
            percentile: Percentile::saturating(percentile),
            trend: Trend::Stable,
            trend_points: vec![],
        }
    }

    fn dimension(categories: Vec<IndicatorCategory>) -> DimensionResult {
        DimensionResult {
            dimension_key: "flow".to_string(),
            dimension_name: "Flow".to_string(),
            health_score: Score0To100::new(58.0),
            css_score: None,
            trend: Trend::Stable,
            categories,
        }
    }

    #[test]
    fn test_css_is_mean_of_indicator_percentiles() {
        let dim = dimension(vec![
            IndicatorCategory {
                name: "speed".to_string(),
                indicators: vec![indicator(40.0), indicator(60.0)],
            },
            IndicatorCategory {
                name: "stability".to_string(),
                indicators: vec![indicator(80.0)],
            },
        ]);
        assert_eq!(dimension_css(&dim).value(), 60.0);
    }

    #[test]
    fn test_css_falls_back_to_health_score_without_indicators() {
        let dim = dimension(vec![]);
        assert_eq!(dimension_css(&dim).value(), 58.0);
    }

    #[test]
    fn test_with_css_fills_the_option() {
        let dim = with_css(dimension(vec![IndicatorCategory {
            name: "speed".to_string(),
            indicators: vec![indicator(70.0)],
        }]));
        assert_eq!(dim.css_score.unwrap().value(), 70.0);
        assert_eq!(dim.weighting_score(), 70.0);
    }
}
