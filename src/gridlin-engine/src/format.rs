// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Sign-explicit numeric tokens.
//!
//! The target grammar reads a sum of coefficient terms with no separator
//! other than the sign, so every token must start with `+` or `-`.  Values
//! render in Rust's shortest round-trip form, which always carries a decimal
//! point or exponent (`3` becomes `+3.0`).

use crate::array::LabeledArray;

/// One signed token.  `append_space` adds the single trailing space used when
/// tokens are concatenated into a line; leave it off for a token that ends a
/// row.
pub fn signed(v: f64, append_space: bool) -> String {
    let mut s = if v >= 0.0 {
        // abs() folds -0.0 into +0.0
        format!("+{:?}", v.abs())
    } else {
        format!("{v:?}")
    };
    if append_space {
        s.push(' ');
    }
    s
}

/// Element-wise `signed` over a labeled array.
pub fn signed_array(values: &LabeledArray<f64>, append_space: bool) -> LabeledArray<String> {
    values.map(|&v| signed(v, append_space))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Axis;
    use proptest::prelude::*;

    #[test]
    fn integers_promote_to_float_text() {
        assert_eq!(signed(3.0, false), "+3.0");
        assert_eq!(signed(-2.0, false), "-2.0");
        assert_eq!(signed(0.0, false), "+0.0");
    }

    #[test]
    fn negative_zero_renders_positive() {
        assert_eq!(signed(-0.0, false), "+0.0");
    }

    #[test]
    fn fractions_keep_their_shortest_form() {
        assert_eq!(signed(0.5, false), "+0.5");
        assert_eq!(signed(-17.25, false), "-17.25");
    }

    #[test]
    fn trailing_space_is_exactly_one() {
        assert_eq!(signed(1.0, true), "+1.0 ");
        assert_eq!(signed(-1.0, true), "-1.0 ");
    }

    #[test]
    fn arrays_format_element_wise() {
        let a = LabeledArray::new(
            vec![Axis::new("Generator", vec!["g1", "g2", "g3"])],
            vec![0.5, -1.0, 2.0],
        )
        .unwrap();
        let s = signed_array(&a, true);
        assert_eq!(s.data(), &["+0.5 ", "-1.0 ", "+2.0 "]);
        assert_eq!(s.axes(), a.axes());
    }

    proptest! {
        #[test]
        fn leading_plus_iff_nonnegative(v in any::<f64>()) {
            let s = signed(v, false);
            prop_assert_eq!(s.starts_with('+'), v >= 0.0);
        }

        #[test]
        fn token_round_trips_magnitude(v in proptest::num::f64::NORMAL) {
            let s = signed(v, false);
            let parsed: f64 = s.parse().unwrap();
            prop_assert_eq!(parsed, v);
        }
    }
}
