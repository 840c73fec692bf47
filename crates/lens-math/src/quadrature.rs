//! Composite Simpson quadrature.

/// Integrate `f` over [a, b] with composite Simpson's rule.
///
/// `intervals` is rounded up to the next even number (minimum 2). Reversed
/// bounds give the negated integral.
pub fn simpson<F>(f: F, a: f64, b: f64, intervals: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let n = intervals.max(2).div_ceil(2) * 2;
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}
