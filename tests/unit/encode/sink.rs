use super::*;
use crate::encode::gif::GifSink;
use crate::encode::png::PngSequenceSink;
use crate::foundation::color::Color;
use crate::foundation::core::Size;
use crate::geometry::layout::ChartConfig;
use crate::geometry::segment::SegmentBuilder;
use crate::render::cpu::CpuBackend;
use crate::reveal::animator::RevealAnimator;
use crate::reveal::request::{AnimationRequest, RevealDirection};

fn short_reveal() -> FrameSequence {
    let mut backend = CpuBackend::default();
    let batch = SegmentBuilder::new()
        .build(
            &[1.0],
            &[Color::rgba(0, 0, 255, 128)],
            Size::new(16.0, 16.0),
            &ChartConfig::default(),
            &mut backend,
        )
        .unwrap();
    let request = AnimationRequest::new(0.05, RevealDirection::Clockwise);
    RevealAnimator::default()
        .render(&batch, &request, &mut backend)
        .unwrap()
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("donutreel-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn export_pushes_frames_in_order() {
    let seq = short_reveal();
    let mut sink = InMemorySink::new();
    export_frames(&seq, &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (16, 16));
    assert_eq!(cfg.frame_count, 4);
    assert!((cfg.frame_interval_s - 0.05 / 3.0).abs() < 1e-12);
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
}

#[test]
fn png_sequence_writes_numbered_straight_alpha_files() {
    let dir = scratch_dir("png");
    let seq = short_reveal();
    let mut sink = PngSequenceSink::new(&dir);
    export_frames(&seq, &mut sink).unwrap();

    assert_eq!(sink.written().len(), 4);
    assert!(dir.join("frame_0000.png").is_file());
    let last = image::open(dir.join("frame_0003.png")).unwrap().to_rgba8();
    let px = last.get_pixel(8, 12).0;
    assert!((127..=129).contains(&px[3]), "{px:?}");
    assert!(px[2] >= 248, "{px:?}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn gif_sink_writes_an_animation() {
    let dir = scratch_dir("gif");
    let path = dir.join("reveal.gif");
    let mut sink = GifSink::new(&path);
    export_frames(&short_reveal(), &mut sink).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn gif_sink_rejects_frames_before_begin() {
    let mut sink = GifSink::new(std::env::temp_dir().join("never-written.gif"));
    let err = sink
        .push_frame(FrameIndex(0), &FrameRGBA::transparent(1, 1))
        .unwrap_err();
    assert!(err.is_validation());
}
