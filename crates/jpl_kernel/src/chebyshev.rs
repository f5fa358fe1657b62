//! Chebyshev series evaluation for SPK records.
//!
//! Both the value and the derivative come from one forward pass over the
//! recurrences `T_{k+1} = 2s T_k - T_{k-1}` and
//! `T'_{k+1} = 2 T_k + 2s T'_k - T'_{k-1}`.

/// Value and derivative (with respect to `s`) of `sum(c_k * T_k(s))`.
pub fn evaluate(coeffs: &[f64], s: f64) -> (f64, f64) {
    match coeffs.len() {
        0 => return (0.0, 0.0),
        1 => return (coeffs[0], 0.0),
        _ => {}
    }

    let two_s = 2.0 * s;
    let (mut t_prev, mut t_cur) = (1.0, s);
    let (mut dt_prev, mut dt_cur) = (0.0, 1.0);
    let mut value = coeffs[0] + coeffs[1] * s;
    let mut derivative = coeffs[1];

    for &c in &coeffs[2..] {
        let t_next = two_s * t_cur - t_prev;
        let dt_next = 2.0 * t_cur + two_s * dt_cur - dt_prev;
        value += c * t_next;
        derivative += c * dt_next;
        (t_prev, t_cur) = (t_cur, t_next);
        (dt_prev, dt_cur) = (dt_cur, dt_next);
    }

    (value, derivative)
}

/// Value of the series via the Clenshaw backward recurrence.
pub fn clenshaw(coeffs: &[f64], s: f64) -> f64 {
    let Some((&c0, rest)) = coeffs.split_first() else {
        return 0.0;
    };
    let two_s = 2.0 * s;
    let (mut b1, mut b2) = (0.0, 0.0);
    for &c in rest.iter().rev() {
        (b1, b2) = (two_s * b1 - b2 + c, b1);
    }
    c0 + s * b1 - b2
}

/// Derivative of the series with respect to `s`.
pub fn clenshaw_derivative(coeffs: &[f64], s: f64) -> f64 {
    evaluate(coeffs, s).1
}
