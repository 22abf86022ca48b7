use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn track(key: &str, frames: usize) -> KeyframeTrack {
    let frames: Vec<FrameRGBA> = (0..frames)
        .map(|i| {
            let mut f = FrameRGBA::transparent(1, 1);
            f.data[3] = i as u8;
            f
        })
        .collect();
    KeyframeTrack {
        key: key.to_owned(),
        frames: frames.into(),
        duration_s: 1.0,
        fill: FillMode::HoldLast,
        remove_on_completion: false,
    }
}

/// Completion that tallies finished and interrupted calls separately.
fn counter() -> (Arc<[AtomicUsize; 2]>, CompletionFn) {
    let n = Arc::new([AtomicUsize::new(0), AtomicUsize::new(0)]);
    let c = Arc::clone(&n);
    (n, Box::new(move |finished| {
        c[usize::from(finished)].fetch_add(1, Ordering::SeqCst);
    }))
}

fn tally(n: &[AtomicUsize; 2]) -> (usize, usize) {
    (n[1].load(Ordering::SeqCst), n[0].load(Ordering::SeqCst))
}

#[test]
fn frame_lookup_spreads_keyframes_over_duration() {
    let t = track("k", 61);
    assert_eq!(t.frame_index_at(0.0), Some(0));
    assert_eq!(t.frame_index_at(0.5), Some(30));
    assert_eq!(t.frame_index_at(1.0), Some(60));
    assert_eq!(t.frame_index_at(5.0), Some(60));
    assert_eq!(t.frame_index_at(-1.0), Some(0));
    assert_eq!(track("k", 0).frame_index_at(0.5), None);
}

#[test]
fn finish_runs_completion_once_and_holds_last_frame() {
    let playback = InMemoryPlayback::new();
    let (n, done) = counter();
    playback.play(track(REVEAL_ANIMATION_KEY, 3), done);

    assert_eq!(playback.presented_frame(REVEAL_ANIMATION_KEY).unwrap().data[3], 0);
    assert!(playback.finish(REVEAL_ANIMATION_KEY));
    assert!(!playback.finish(REVEAL_ANIMATION_KEY));
    assert_eq!(tally(&n), (1, 0));
    assert_eq!(playback.presented_frame(REVEAL_ANIMATION_KEY).unwrap().data[3], 2);
    assert!(playback.track(REVEAL_ANIMATION_KEY).is_some());
}

#[test]
fn replaced_track_completes_as_interrupted() {
    let playback = InMemoryPlayback::new();
    let (first, done1) = counter();
    let (second, done2) = counter();
    playback.play(track("k", 2), done1);
    playback.play(track("k", 5), done2);
    assert_eq!(tally(&first), (0, 1));
    assert_eq!(tally(&second), (0, 0));

    assert_eq!(playback.track("k").unwrap().frames.len(), 5);
    assert!(playback.finish("k"));
    assert_eq!(tally(&first), (0, 1));
    assert_eq!(tally(&second), (1, 0));
    assert_eq!(playback.started(), vec!["k".to_owned(), "k".to_owned()]);
}

#[test]
fn removing_a_playing_track_completes_it_as_interrupted() {
    let playback = InMemoryPlayback::new();
    let (n, done) = counter();
    playback.play(track("k", 3), done);
    playback.remove("k");
    playback.remove("k");

    assert_eq!(tally(&n), (0, 1));
    assert!(!playback.finish("k"));
    assert_eq!(tally(&n), (0, 1));
}

#[test]
fn completion_may_remove_its_own_track() {
    let playback = Arc::new(InMemoryPlayback::new());
    let p = Arc::clone(&playback);
    let (n, done) = counter();
    playback.play(
        track("k", 2),
        Box::new(move |finished| {
            p.remove("k");
            done(finished);
        }),
    );
    assert!(playback.finish("k"));
    assert!(playback.track("k").is_none());
    assert!(!playback.finish("k"));
    assert_eq!(tally(&n), (1, 0));
}

#[test]
fn clear_fill_presents_nothing_after_finish() {
    let playback = InMemoryPlayback::new();
    let mut t = track("k", 2);
    t.fill = FillMode::Clear;
    t.remove_on_completion = true;
    playback.play(t, Box::new(|_| {}));
    assert!(playback.finish("k"));
    assert!(playback.presented_frame("k").is_none());
    assert!(playback.track("k").is_none());
}
