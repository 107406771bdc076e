//! Two-Sample Kolmogorov-Smirnov Test
//!
//! Statistic over two sorted samples plus the asymptotic p-value of the
//! Kolmogorov distribution.

/// Supremum distance between the empirical CDFs of two sorted samples.
///
/// Both inputs must be sorted ascending; returns 0.0 if either is empty.
pub fn ks_statistic(sorted_a: &[f64], sorted_b: &[f64]) -> f64 {
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0.0;
    }

    let (na, nb) = (sorted_a.len() as f64, sorted_b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max: f64 = 0.0;

    while i < sorted_a.len() && j < sorted_b.len() {
        let a = sorted_a[i];
        let b = sorted_b[j];
        let value = a.min(b);
        // Advance past ties within each sample before measuring.
        while i < sorted_a.len() && sorted_a[i] <= value {
            i += 1;
        }
        while j < sorted_b.len() && sorted_b[j] <= value {
            j += 1;
        }
        let d = (i as f64 / na - j as f64 / nb).abs();
        d_max = d_max.max(d);
    }

    d_max
}

/// Asymptotic p-value for a two-sample KS statistic.
///
/// Uses the effective sample size `n_a * n_b / (n_a + n_b)` and the
/// Kolmogorov distribution series with the small-sample correction term.
pub fn ks_p_value(statistic: f64, n_a: usize, n_b: usize) -> f64 {
    if n_a == 0 || n_b == 0 {
        return 1.0;
    }

    let en = (n_a as f64 * n_b as f64) / (n_a as f64 + n_b as f64);
    let lambda = (en.sqrt() + 0.12 + 0.11 / en.sqrt()) * statistic;
    kolmogorov_survival(lambda)
}

/// Survival function of the Kolmogorov distribution,
/// `Q(lambda) = 2 * sum_{j>=1} (-1)^(j-1) exp(-2 j^2 lambda^2)`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda < 1e-3 {
        return 1.0;
    }

    let mut sum = 0.0;
    let mut sign = 1.0;
    let mut prev_term = f64::INFINITY;
    for j in 1..=100 {
        let term = (-2.0 * (j as f64) * (j as f64) * lambda * lambda).exp();
        sum += sign * term;
        // The ratio test only makes sense once a previous term exists.
        if term < 1e-12 || (j > 1 && term / prev_term < 1e-12) {
            break;
        }
        prev_term = term;
        sign = -sign;
    }

    (2.0 * sum).clamp(0.0, 1.0)
}
