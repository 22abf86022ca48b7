use super::*;

#[test]
fn defaults_to_sequential_linear() {
    let r = AnimationRequest::new(1.0, RevealDirection::Clockwise);
    assert_eq!(r.style, RevealStyle::Sequential);
    assert_eq!(r.easing.ease(0.25, 1.0), 0.25);
    assert!(r.validate().is_ok());
}

#[test]
fn rejects_bad_durations_and_simultaneous_style() {
    for d in [0.0, -1.0, f64::INFINITY, f64::NAN] {
        let err = AnimationRequest::new(d, RevealDirection::Clockwise)
            .validate()
            .unwrap_err();
        assert!(err.is_validation());
    }
    let err = AnimationRequest::new(1.0, RevealDirection::CounterClockwise)
        .with_style(RevealStyle::Simultaneous)
        .validate()
        .unwrap_err();
    assert!(matches!(err, DonutError::Unsupported(_)));
}

#[test]
fn callbacks_are_taken_once() {
    let mut r = AnimationRequest::new(1.0, RevealDirection::Clockwise)
        .on_complete(|| {})
        .on_failure(|_| {});
    assert!(format!("{r:?}").contains("on_complete: true"));
    let (c, f) = r.take_callbacks();
    assert!(c.is_some() && f.is_some());
    let (c, f) = r.take_callbacks();
    assert!(c.is_none() && f.is_none());
}

#[test]
fn direction_sign_and_serde_names() {
    assert_eq!(RevealDirection::Clockwise.sign(), 1.0);
    assert_eq!(RevealDirection::CounterClockwise.sign(), -1.0);
    let d: RevealDirection = serde_json::from_str("\"CounterClockwise\"").unwrap();
    assert_eq!(d, RevealDirection::CounterClockwise);
}
