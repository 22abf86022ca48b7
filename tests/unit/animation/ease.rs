use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert!(approx(ease.apply(0.0), 0.0), "{ease:?} at 0");
        assert!(approx(ease.apply(1.0), 1.0), "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(-3.0), ease.apply(0.0));
        assert_eq!(ease.apply(7.0), ease.apply(1.0));
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InCirc,
        Ease::OutCirc,
    ] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn back_and_elastic_leave_unit_range() {
    assert!(Ease::InBack.apply(0.2) < 0.0);
    assert!(Ease::OutBack.apply(0.8) > 1.0);
    let peak = (1..100)
        .map(|i| Ease::OutElastic.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
    assert!(Ease::OutBack.overshoots());
    assert!(!Ease::OutBounce.overshoots());
}

#[test]
fn closures_plug_in_as_easing() {
    let half = EaseFn(|t: f64, d: f64| t * d);
    assert!(approx(half.ease(0.5, 2.0), 1.0));
    assert!(approx(Ease::InQuad.ease(0.5, 10.0), 0.25));
}

#[test]
fn serde_uses_variant_names() {
    let v = serde_json::to_value(Ease::OutCubic).unwrap();
    assert_eq!(v, serde_json::json!("OutCubic"));
    let e: Ease = serde_json::from_value(serde_json::json!("InOutBounce")).unwrap();
    assert_eq!(e, Ease::InOutBounce);
}
