//! Free-text salary normalization.

use regex::Regex;

use crate::models::SalaryConfig;

/// A normalized monthly salary range in thousands ("K").
///
/// `median_k` is the representative value used for filtering, KPI
/// averaging, and bucketing: the midpoint of the range, or the single
/// parsed value. `low_k <= median_k <= high_k` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub low_k: f64,
    pub high_k: f64,
    pub median_k: f64,
}

/// Unit suffix attached to a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    /// "K" / "k" / "千"
    Thousand,
    /// "万" (1万 = 10K)
    TenThousand,
}

/// Figures extracted by one pattern case, before normalization.
struct RawFigures {
    low: f64,
    high: f64,
    unit: Option<Unit>,
}

/// Parser for free-text salary descriptions.
///
/// Pattern cases are tried in a fixed priority order: range, open-ended,
/// single value with unit, bare number. Each produces raw figures that
/// then go through unit and period normalization.
///
/// Open-ended texts ("25K以上", "25K+") mirror the stated floor into the
/// upper bound, so their median equals the floor; the same policy feeds
/// filtering, averaging, and bucketing.
///
/// "N薪" texts are read as per-period figures: the monthly equivalent is
/// `period * N / 12`. Texts quoting a yearly total ("30-40万/年") divide
/// by N instead, with N defaulting to 12.
pub struct SalaryParser {
    bare_number_threshold_k: f64,
    multiplier: Regex,
    range: Regex,
    open_ended: Regex,
    single: Regex,
    bare: Regex,
}

impl SalaryParser {
    /// Build a parser; the regexes are compiled once here.
    pub fn new(config: &SalaryConfig) -> Self {
        Self {
            bare_number_threshold_k: config.bare_number_threshold_k,
            multiplier: Regex::new(r"[×xX*·]?\s*(\d{1,2})\s*薪").expect("valid pattern"),
            range: Regex::new(
                r"(\d+(?:\.\d+)?)\s*(万|[kK千])?\s*(?:[-~～－—]|到|至)\s*(\d+(?:\.\d+)?)\s*(万|[kK千])?",
            )
            .expect("valid pattern"),
            open_ended: Regex::new(r"(\d+(?:\.\d+)?)\s*(万|[kK千])?\s*(?:以上|\+)")
                .expect("valid pattern"),
            single: Regex::new(r"(\d+(?:\.\d+)?)\s*(万|[kK千])").expect("valid pattern"),
            bare: Regex::new(r"(\d+(?:\.\d+)?)").expect("valid pattern"),
        }
    }

    /// Parse a salary text.
    ///
    /// Returns `None` for anything that cannot be read as a salary
    /// ("面议", empty text, garbage), never an error.
    pub fn parse(&self, text: &str) -> Option<SalaryRange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let months = self.extract_months(text);
        let stripped = self.multiplier.replace_all(text, "");
        let raw = self.match_figures(&stripped)?;

        let mut low = self.to_k(raw.low, raw.unit);
        let mut high = self.to_k(raw.high, raw.unit);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }

        // Yearly totals divide across the payment count; per-period
        // figures scale by the payments-per-year ratio.
        if stripped.contains('年') {
            low /= months;
            high /= months;
        } else {
            low *= months / 12.0;
            high *= months / 12.0;
        }

        if !low.is_finite() || !high.is_finite() || high <= 0.0 {
            return None;
        }

        Some(SalaryRange {
            low_k: low,
            high_k: high,
            median_k: (low + high) / 2.0,
        })
    }

    /// Payment count from an "N薪" suffix, 12 when absent.
    fn extract_months(&self, text: &str) -> f64 {
        self.multiplier
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|n| *n >= 1.0)
            .unwrap_or(12.0)
    }

    fn match_figures(&self, text: &str) -> Option<RawFigures> {
        if let Some(caps) = self.range.captures(text) {
            let low = caps.get(1)?.as_str().parse().ok()?;
            let high = caps.get(3)?.as_str().parse().ok()?;
            // The unit may sit on either side of the range; the high side
            // wins when both are present.
            let unit = caps
                .get(4)
                .or_else(|| caps.get(2))
                .and_then(|m| parse_unit(m.as_str()));
            return Some(RawFigures { low, high, unit });
        }

        if let Some(caps) = self.open_ended.captures(text) {
            let low: f64 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2).and_then(|m| parse_unit(m.as_str()));
            // Open-ended policy: the upper bound mirrors the floor.
            return Some(RawFigures {
                low,
                high: low,
                unit,
            });
        }

        if let Some(caps) = self.single.captures(text) {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2).and_then(|m| parse_unit(m.as_str()));
            return Some(RawFigures {
                low: value,
                high: value,
                unit,
            });
        }

        if let Some(caps) = self.bare.captures(text) {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            return Some(RawFigures {
                low: value,
                high: value,
                unit: None,
            });
        }

        None
    }

    /// Convert one raw figure to K.
    fn to_k(&self, value: f64, unit: Option<Unit>) -> f64 {
        match unit {
            Some(Unit::TenThousand) => value * 10.0,
            Some(Unit::Thousand) => value,
            None if value <= self.bare_number_threshold_k => value,
            None => value / 1000.0,
        }
    }
}

impl Default for SalaryParser {
    fn default() -> Self {
        Self::new(&SalaryConfig::default())
    }
}

fn parse_unit(s: &str) -> Option<Unit> {
    match s {
        "万" => Some(Unit::TenThousand),
        "k" | "K" | "千" => Some(Unit::Thousand),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<SalaryRange> {
        SalaryParser::default().parse(text)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_range_with_k() {
        let range = parse("15-25K").unwrap();
        assert_close(range.low_k, 15.0);
        assert_close(range.high_k, 25.0);
        assert_close(range.median_k, 20.0);
    }

    #[test]
    fn test_single_value_with_k() {
        let range = parse("20K").unwrap();
        assert_close(range.low_k, 20.0);
        assert_close(range.high_k, 20.0);
        assert_close(range.median_k, 20.0);
    }

    #[test]
    fn test_open_ended_mirrors_floor() {
        let range = parse("25K以上").unwrap();
        assert_close(range.low_k, 25.0);
        assert_close(range.high_k, 25.0);
        assert_close(range.median_k, 25.0);

        let plus = parse("30K+").unwrap();
        assert_close(plus.median_k, 30.0);
    }

    #[test]
    fn test_range_with_wan() {
        let range = parse("15-20万").unwrap();
        assert_close(range.low_k, 150.0);
        assert_close(range.high_k, 200.0);
        assert_close(range.median_k, 175.0);
    }

    #[test]
    fn test_decimal_wan_range() {
        let range = parse("1.5-2.5万").unwrap();
        assert_close(range.low_k, 15.0);
        assert_close(range.high_k, 25.0);
        assert_close(range.median_k, 20.0);
    }

    #[test]
    fn test_negotiable_is_none() {
        assert!(parse("面议").is_none());
        assert!(parse("薪资面议").is_none());
        assert!(parse("").is_none());
        assert!(parse("   ").is_none());
    }

    #[test]
    fn test_thirteen_salary_rescales_monthly_figures() {
        // Per-period convention: 15-20K paid 13 times a year.
        for text in ["15-20K·13薪", "15-20K×13薪"] {
            let range = parse(text).unwrap();
            assert_close(range.low_k, 15.0 * 13.0 / 12.0);
            assert_close(range.high_k, 20.0 * 13.0 / 12.0);
            assert_close(range.median_k, 17.5 * 13.0 / 12.0);
        }
    }

    #[test]
    fn test_twelve_salary_is_identity() {
        let plain = parse("15-20K").unwrap();
        let twelve = parse("15-20K·12薪").unwrap();
        assert_close(twelve.median_k, plain.median_k);
    }

    #[test]
    fn test_yearly_total_divides_by_payment_count() {
        let range = parse("24-36万/年").unwrap();
        assert_close(range.low_k, 20.0);
        assert_close(range.high_k, 30.0);
        assert_close(range.median_k, 25.0);
    }

    #[test]
    fn test_yearly_single_value() {
        let range = parse("年薪60万").unwrap();
        assert_close(range.median_k, 50.0);
    }

    #[test]
    fn test_bare_range_within_threshold_is_k() {
        let range = parse("15-20").unwrap();
        assert_close(range.low_k, 15.0);
        assert_close(range.high_k, 20.0);
    }

    #[test]
    fn test_bare_large_numbers_are_yuan() {
        let range = parse("8000-12000").unwrap();
        assert_close(range.low_k, 8.0);
        assert_close(range.high_k, 12.0);
        assert_close(range.median_k, 10.0);
    }

    #[test]
    fn test_bare_single_large_number() {
        let range = parse("15000").unwrap();
        assert_close(range.median_k, 15.0);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let parser = SalaryParser::new(&SalaryConfig {
            bare_number_threshold_k: 10.0,
        });
        // 50 exceeds the custom threshold, so it is raw yuan.
        let range = parser.parse("50").unwrap();
        assert_close(range.median_k, 0.05);
    }

    #[test]
    fn test_alternate_separators() {
        for text in ["15~25K", "15～25K", "15到25K", "15至25K"] {
            let range = parse(text).unwrap();
            assert_close(range.median_k, 20.0);
        }
    }

    #[test]
    fn test_unit_on_both_sides() {
        let range = parse("1万-2万").unwrap();
        assert_close(range.low_k, 10.0);
        assert_close(range.high_k, 20.0);
    }

    #[test]
    fn test_qian_unit() {
        let range = parse("8千").unwrap();
        assert_close(range.median_k, 8.0);
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let range = parse("25-15K").unwrap();
        assert_close(range.low_k, 15.0);
        assert_close(range.high_k, 25.0);
    }

    #[test]
    fn test_invariant_low_median_high() {
        for text in ["15-25K", "20K", "25K以上", "1.5-2.5万", "15-20K·13薪"] {
            let range = parse(text).unwrap();
            assert!(range.low_k <= range.median_k);
            assert!(range.median_k <= range.high_k);
        }
    }
}
