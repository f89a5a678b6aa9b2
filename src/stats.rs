use std::fmt;

// ---------------------------------------------------------------------------
// Running mean / standard deviation
// ---------------------------------------------------------------------------

/// Welford accumulator for mean and sample variance.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    /// NaN when nothing was added.
    pub fn mean(&self) -> f64 {
        if self.n_vals == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Sample standard deviation (n − 1 denominator); NaN below two values.
    pub fn std_dev(&self) -> f64 {
        if self.n_vals > 1 {
            (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
        } else {
            f64::NAN
        }
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        for v in iter {
            acc.add(v);
        }
        acc
    }
}

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Quantile of already-sorted data, linearly interpolated between the two
/// closest ranks at position `(n - 1) * p`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
            let lo = h.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
        }
    }
}

/// Interquartile range Q3 − Q1 (linear interpolation).
pub fn iqr(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25)
}

// ---------------------------------------------------------------------------
// SummaryStats – one row of the summary table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    pub std_dev: f64,
    pub iqr: f64,
}

impl SummaryStats {
    pub fn compute(values: &[f64]) -> Self {
        let acc: Accumulator = values.iter().copied().collect();
        Self {
            mean: acc.mean(),
            std_dev: acc.std_dev(),
            iqr: iqr(values),
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.4} std={:.4} iqr={:.4}",
            self.mean, self.std_dev, self.iqr
        )
    }
}

/// A labelled variable in the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub parameter: String,
    pub stats: SummaryStats,
}

/// The fixed-shape table: one row per variable, columns [`SummaryTable::HEADERS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub const HEADERS: [&'static str; 4] = [
        "Parameter",
        "Mean",
        "Standard Deviation",
        "Interquartile Range",
    ];

    pub fn push(&mut self, parameter: impl Into<String>, values: &[f64]) {
        self.rows.push(SummaryRow {
            parameter: parameter.into(),
            stats: SummaryStats::compute(values),
        });
    }

    /// Cell text, values rounded to four decimals.
    pub fn cells(&self) -> Vec<[String; 4]> {
        self.rows
            .iter()
            .map(|row| {
                [
                    row.parameter.clone(),
                    format_value(row.stats.mean),
                    format_value(row.stats.std_dev),
                    format_value(row.stats.iqr),
                ]
            })
            .collect()
    }
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Counts over fixed bin edges. Every bin is `[a, b)` except the last,
/// which also includes its right edge; values outside the edges are not
/// counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Edges `start, start + width, …, stop` (stop included).
    pub fn uniform_edges(start: f64, stop: f64, width: f64) -> Vec<f64> {
        let n = ((stop - start) / width).round() as usize;
        (0..=n).map(|i| start + i as f64 * width).collect()
    }

    pub fn with_edges(edges: Vec<f64>, values: &[f64]) -> Self {
        let mut counts = vec![0usize; edges.len().saturating_sub(1)];
        if let (Some(&first), Some(&last)) = (edges.first(), edges.last()) {
            for &v in values {
                if !(first..=last).contains(&v) || counts.is_empty() {
                    continue;
                }
                let bin = if v == last {
                    counts.len() - 1
                } else {
                    edges.partition_point(|&e| e <= v) - 1
                };
                counts[bin] += 1;
            }
        }
        Self { edges, counts }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left, right, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}
