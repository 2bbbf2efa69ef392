//! Dual moving average crossover detection.
//!
//! A golden cross is the fast average rising above the slow one, a death cross
//! the reverse. Averages are computed over the full history; only the trailing
//! `lookback` samples are scanned and returned as the display window.

use stockscope_core::{CrossKind, CrossSignal, HistoricalData, PriceSeries, Symbol};
use tracing::debug;

/// Default fast average window.
pub const DEFAULT_FAST: usize = 50;
/// Default slow average window.
pub const DEFAULT_SLOW: usize = 200;
/// Default display and scan window (roughly one trading year).
pub const DEFAULT_LOOKBACK: usize = 252;

/// Simple moving average of `values` over `window` samples.
///
/// The result has one entry per input; entries with fewer than `window`
/// samples behind them are `None`. A zero window yields all `None`.
#[must_use]
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for i in window - 1..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        result[i] = Some(sum / window as f64);
    }
    result
}

/// Detects fast/slow moving average crossovers in a price series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossoverDetector {
    fast: usize,
    slow: usize,
    lookback: usize,
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self::new(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_LOOKBACK)
    }
}

impl CrossoverDetector {
    /// Creates a detector with the given fast/slow windows and lookback.
    #[must_use]
    pub const fn new(fast: usize, slow: usize, lookback: usize) -> Self {
        Self {
            fast,
            slow,
            lookback,
        }
    }

    /// Fast average window.
    #[must_use]
    pub const fn fast(&self) -> usize {
        self.fast
    }

    /// Slow average window.
    #[must_use]
    pub const fn slow(&self) -> usize {
        self.slow
    }

    /// Scan/display window.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.lookback
    }

    /// First index scanned for a series of `len` samples. Never below 1.
    #[must_use]
    pub const fn scan_start(&self, len: usize) -> usize {
        let start = len.saturating_sub(self.lookback);
        if start < 1 { 1 } else { start }
    }

    fn signals(
        &self,
        series: &PriceSeries,
        fast: &[Option<f64>],
        slow: &[Option<f64>],
    ) -> Vec<CrossSignal> {
        let bars = series.bars();
        let mut signals = Vec::new();

        for i in self.scan_start(bars.len())..bars.len() {
            let (Some(f_prev), Some(s_prev), Some(f_cur), Some(s_cur)) =
                (fast[i - 1], slow[i - 1], fast[i], slow[i])
            else {
                continue;
            };

            let kind = if f_prev <= s_prev && f_cur > s_cur {
                CrossKind::Golden
            } else if f_prev >= s_prev && f_cur < s_cur {
                CrossKind::Death
            } else {
                continue;
            };

            signals.push(CrossSignal {
                kind,
                date: bars[i].date,
                price: bars[i].close,
            });
        }

        signals
    }

    /// Returns the crossovers in the trailing lookback window, ascending by date.
    #[must_use]
    pub fn detect(&self, series: &PriceSeries) -> Vec<CrossSignal> {
        let closes = series.closes();
        let fast = simple_moving_average(&closes, self.fast);
        let slow = simple_moving_average(&closes, self.slow);
        self.signals(series, &fast, &slow)
    }

    /// Builds the display window: the trailing lookback samples with both
    /// averages and the detected crossovers.
    #[must_use]
    pub fn historical_data(&self, ticker: &Symbol, series: &PriceSeries) -> HistoricalData {
        let closes = series.closes();
        let fast = simple_moving_average(&closes, self.fast);
        let slow = simple_moving_average(&closes, self.slow);
        let cross_signals = self.signals(series, &fast, &slow);

        let start = series.len().saturating_sub(self.lookback);
        let window = &series.bars()[start..];

        debug!(
            ticker = %ticker,
            samples = series.len(),
            displayed = window.len(),
            signals = cross_signals.len(),
            "Built historical window"
        );

        HistoricalData {
            dates: window.iter().map(|bar| bar.date).collect(),
            close: window.iter().map(|bar| bar.close).collect(),
            volume: window.iter().map(|bar| bar.volume).collect(),
            ma_50: fast[start..].to_vec(),
            ma_200: slow[start..].to_vec(),
            cross_signals,
            ticker: ticker.clone(),
        }
    }
}
