/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Quartiles use linear interpolation between closest ranks.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(BoxSummary {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// One histogram bar covering `[start, end)`, or `[start, end]` for the last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning the observed range of `values`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if hi == lo {
        return vec![HistogramBin {
            start: lo - 0.5,
            end: hi + 0.5,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let i = (((v - lo) / width) as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_summary_of_odd_series() {
        let s = box_summary(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            s,
            BoxSummary {
                min: 1.0,
                q1: 2.0,
                median: 3.0,
                q3: 4.0,
                max: 5.0
            }
        );
    }

    #[test]
    fn box_summary_interpolates() {
        let s = box_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.q3, 3.25);
    }

    #[test]
    fn box_summary_of_nothing() {
        assert_eq!(box_summary(&[]), None);
    }

    #[test]
    fn histogram_one_value_per_bin() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.count == 1));
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 9.0);
    }

    #[test]
    fn histogram_counts_everything() {
        let values = [-3.2, -1.0, 0.0, 0.1, 0.2, 2.5, 4.9];
        let bins = histogram(&values, 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
        let single = histogram(&[2.0, 2.0, 2.0], 10);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
        assert_eq!(single[0].center(), 2.0);
    }
}
