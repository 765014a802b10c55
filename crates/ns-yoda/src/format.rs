//! Number formatting for YODA text.

/// Format like C's `%.6e`: `1.500000e+00`, `-2.500000e-03`, `nan`, `-inf`.
pub fn sci(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{x:.6e}");
    // Rust renders the exponent bare (`e0`, `e-3`); C pads to two digits with a sign.
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Left-align `label` to at least `width` characters.
pub fn label(label: &str, width: usize) -> String {
    format!("{label:<width$}")
}

/// Whether `s` has the exact `%.6e` shape of a finite number.
pub fn is_sci(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let Some((mantissa, exp)) = body.split_once('e') else {
        return false;
    };
    let Some((int, frac)) = mantissa.split_once('.') else {
        return false;
    };
    let Some(exp_digits) = exp.strip_prefix('+').or_else(|| exp.strip_prefix('-')) else {
        return false;
    };
    int.len() == 1
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.len() == 6
        && frac.bytes().all(|b| b.is_ascii_digit())
        && exp_digits.len() >= 2
        && exp_digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_style_exponent() {
        assert_eq!(sci(1.5), "1.500000e+00");
        assert_eq!(sci(10.0), "1.000000e+01");
        assert_eq!(sci(0.0), "0.000000e+00");
        assert_eq!(sci(-0.0025), "-2.500000e-03");
        assert_eq!(sci(1e100), "1.000000e+100");
        assert_eq!(sci(1.23456789e-300), "1.234568e-300");
    }

    #[test]
    fn non_finite() {
        assert_eq!(sci(f64::NAN), "nan");
        assert_eq!(sci(f64::INFINITY), "inf");
        assert_eq!(sci(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn shape_check() {
        for x in [0.0, 1.0, -3.25, 6.02e23, 1e-7, 1e100] {
            assert!(is_sci(&sci(x)), "{}", sci(x));
        }
        for s in ["nan", "1.5e+00", "1.500000e0", "15.000000e+00", "1.500000e+0", "Total"] {
            assert!(!is_sci(s), "{s}");
        }
    }

    #[test]
    fn label_padding() {
        assert_eq!(label("Total", 0), "Total");
        assert_eq!(label("Total", 8), "Total   ");
        assert_eq!(label("Underflow", 8), "Underflow");
    }
}
