//! Formatting helpers shared by chart initialization and update
//!
//! Everything here is pure: snapshot in, labels/series/text out.

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use crate::chart::Label;
use crate::snapshot::{GlucoseSeries, Sample};

/// Separator placed between notifications
pub const NOTIFICATION_SEPARATOR: &str = " • ";

/// Label shown for samples with no usable timestamp
pub const MISSING_TIME_LABEL: &str = "--:--";

/// Time zone used for hour:minute axis labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelZone {
    #[default]
    Local,
    Utc,
}

impl LabelZone {
    pub fn format(&self, time: DateTime<Utc>) -> String {
        match self {
            LabelZone::Local => time.with_timezone(&Local).format("%H:%M").to_string(),
            LabelZone::Utc => time.format("%H:%M").to_string(),
        }
    }
}

/// Hour:minute label for a sample
pub fn time_label(sample: &Sample, zone: LabelZone) -> Label {
    let text = match sample.time() {
        Some(time) => zone.format(time),
        None => MISSING_TIME_LABEL.to_string(),
    };
    Label::Text(text)
}

/// Index labels `0..len`
pub fn position_labels(len: usize) -> Vec<Label> {
    (0..len).map(Label::Position).collect()
}

/// Sample values as a series with no placeholders
pub fn values(samples: &[Sample]) -> Vec<Option<f64>> {
    samples.iter().map(|s| Some(s.v)).collect()
}

/// Measured and predicted glucose laid out on one shared axis
///
/// History labels come first, predicted labels after them. The measured
/// series is padded at the end and the predicted series at the start, so
/// the two segments never overlap on the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GlucoseAxis {
    pub labels: Vec<Label>,
    pub measured: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
}

impl GlucoseAxis {
    pub fn build(glucose: &GlucoseSeries, zone: LabelZone) -> Self {
        let history = &glucose.history;
        let predicted = &glucose.predicted;

        let labels = history
            .iter()
            .chain(predicted.iter())
            .map(|s| time_label(s, zone))
            .collect();

        let mut measured_series = values(history);
        measured_series.resize(history.len() + predicted.len(), None);

        let mut predicted_series = vec![None; history.len()];
        predicted_series.extend(predicted.iter().map(|s| Some(s.v)));

        Self {
            labels,
            measured: measured_series,
            predicted: predicted_series,
        }
    }
}

/// Two-decimal fixed-point rendering used for the glucose readouts
///
/// Rounds on the exact decimal expansion of the value, with ties going
/// away from zero (`5.125` → `"5.13"`, `1.005` → `"1.00"` since it is
/// stored slightly below the tie). Negative zero prints as `"0.00"`.
/// Values of 1e21 and above fall back to [`js_number`].
pub fn fixed2(value: f64) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }

    // Every finite f64 terminates within 1074 decimal places
    let exact = format!("{:.1100}", value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    if frac.as_bytes().get(2).is_some_and(|&d| d >= b'5') {
        increment(&mut digits);
    }

    let point = digits.len() - 2;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    for (i, d) in digits.iter().enumerate() {
        if i == point {
            out.push('.');
        }
        out.push(char::from(b'0' + d));
    }
    out
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

/// Render a number the way it stringifies on the page
///
/// Integral values drop the fraction (`20` not `20.0`), short decimals
/// keep their shortest form (`0.8`). Magnitudes from 1e21 up and below
/// 1e-6 switch to exponent form (`1e+21`, `1e-7`).
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        let sci = format!("{:e}", value);
        match sci.split_once('e') {
            Some((mantissa, exp)) => match exp.parse::<i32>() {
                Ok(e) if (-6..=20).contains(&e) => value.to_string(),
                Ok(e) if e > 0 => format!("{}e+{}", mantissa, e),
                _ => sci,
            },
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glucose(history: &[(i64, f64)], predicted: &[(i64, f64)]) -> GlucoseSeries {
        GlucoseSeries {
            history: history.iter().map(|&(t, v)| Sample::at(t, v)).collect(),
            predicted: predicted.iter().map(|&(t, v)| Sample::at(t, v)).collect(),
        }
    }

    #[test]
    fn test_combined_axis_padding() {
        let series = glucose(&[(0, 5.0), (60_000, 5.2)], &[(120_000, 5.5)]);
        let axis = GlucoseAxis::build(&series, LabelZone::Utc);

        assert_eq!(
            axis.labels,
            vec![
                Label::Text("00:00".into()),
                Label::Text("00:01".into()),
                Label::Text("00:02".into()),
            ]
        );
        assert_eq!(axis.measured, vec![Some(5.0), Some(5.2), None]);
        assert_eq!(axis.predicted, vec![None, None, Some(5.5)]);
    }

    #[test]
    fn test_combined_axis_lengths() {
        for (h, p) in [(0, 0), (0, 3), (4, 0), (5, 7)] {
            let history: Vec<_> = (0..h).map(|i| (i * 60_000, 5.0)).collect();
            let predicted: Vec<_> = (0..p).map(|i| ((h + i) * 60_000, 6.0)).collect();
            let axis = GlucoseAxis::build(&glucose(&history, &predicted), LabelZone::Utc);

            let total = (h + p) as usize;
            assert_eq!(axis.labels.len(), total);
            assert_eq!(axis.measured.len(), total);
            assert_eq!(axis.predicted.len(), total);
            assert!(axis.measured[h as usize..].iter().all(Option::is_none));
            assert!(axis.predicted[..h as usize].iter().all(Option::is_none));
            assert!(axis.predicted[h as usize..].iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_missing_time_label() {
        assert_eq!(
            time_label(&Sample::untimed(1.0), LabelZone::Utc),
            Label::Text(MISSING_TIME_LABEL.into())
        );
    }

    #[test]
    fn test_position_labels_ignore_timestamps() {
        assert_eq!(
            position_labels(3),
            vec![Label::Position(0), Label::Position(1), Label::Position(2)]
        );
        assert!(position_labels(0).is_empty());
    }

    #[test]
    fn test_fixed2() {
        assert_eq!(fixed2(5.1), "5.10");
        assert_eq!(fixed2(5.2), "5.20");
        assert_eq!(fixed2(12.0), "12.00");
        assert_eq!(fixed2(-0.5), "-0.50");
        assert_eq!(fixed2(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_fixed2_rounds_ties_away_from_zero() {
        assert_eq!(fixed2(0.125), "0.13");
        assert_eq!(fixed2(5.125), "5.13");
        assert_eq!(fixed2(-5.125), "-5.13");
        // Stored as 1.00499999999999989...
        assert_eq!(fixed2(1.005), "1.00");
        assert_eq!(fixed2(99.999), "100.00");
    }

    #[test]
    fn test_fixed2_signs() {
        assert_eq!(fixed2(-0.0), "0.00");
        assert_eq!(fixed2(0.0), "0.00");
        assert_eq!(fixed2(-0.001), "-0.00");
        assert_eq!(fixed2(1e-300), "0.00");
        assert_eq!(fixed2(1e21), "1e+21");
    }

    #[test]
    fn test_js_number() {
        assert_eq!(js_number(20.0), "20");
        assert_eq!(js_number(0.8), "0.8");
        assert_eq!(js_number(15.0), "15");
        assert_eq!(js_number(-0.0), "0");
        assert_eq!(js_number(f64::NAN), "NaN");
        assert_eq!(js_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_js_number_exponent_range() {
        assert_eq!(js_number(1e21), "1e+21");
        assert_eq!(js_number(-2.5e22), "-2.5e+22");
        assert_eq!(js_number(1e20), "100000000000000000000");
        assert_eq!(js_number(123456.0), "123456");
        assert_eq!(js_number(0.000001), "0.000001");
        assert_eq!(js_number(1e-7), "1e-7");
        assert_eq!(js_number(1.5e-7), "1.5e-7");
    }
}
