use glimmer_color::{Rgb, add, from_string};
use proptest::prelude::*;

fn arb_rgb() -> impl Strategy<Value = Rgb> {
    (0u32..=100_000, 0u32..=100_000, 0u32..=100_000).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

proptest! {
    // Scaling by a factor in [0,1] never raises a channel
    #[test]
    fn scaled_by_unit_factor_never_grows(c in arb_rgb(), f in 0.0f64..=1.0) {
        let s = c.scaled(f);
        prop_assert!(s.r <= c.r && s.g <= c.g && s.b <= c.b);
    }

    // Rounding error per channel is at most one half
    #[test]
    fn scaled_rounds_to_nearest(c in arb_rgb(), f in 0.0f64..=4.0) {
        let s = c.scaled(f);
        for ch in 0..3 {
            prop_assert!((s[ch] as f64 - c[ch] as f64 * f).abs() <= 0.5 + 1e-9);
        }
    }

    // In-place add matches the operator and is commutative
    #[test]
    fn add_matches_operator(a in arb_rgb(), b in arb_rgb()) {
        let mut t = a;
        add(&mut t, b);
        prop_assert_eq!(t, a + b);
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(t.sum(), a.sum() + b.sum());
    }

    // rgb() notation accepts arbitrary whitespace around channels
    #[test]
    fn rgb_notation_parses(r in 0u32..1000, g in 0u32..1000, b in 0u32..1000, pad in " {0,3}") {
        let s = format!("rgb({pad}{r},{pad}{g}{pad},{b})");
        prop_assert_eq!(from_string(&s), Ok(Rgb::new(r, g, b)));
    }
}
