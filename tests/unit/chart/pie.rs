use super::*;
use crate::chart::host::{InMemorySurface, InlineExecutor, MainQueue, SurfaceOp};
use crate::reveal::request::{RevealDirection, RevealStyle};
use crate::reveal::track::InMemoryPlayback;

fn chart(bounds: Size) -> (PieChart, Arc<InMemorySurface>, Arc<InMemoryPlayback>) {
    let surface = Arc::new(InMemorySurface::new(bounds));
    let playback = Arc::new(InMemoryPlayback::new());
    let chart = PieChart::new(surface.clone(), playback.clone(), Arc::new(InlineExecutor)).unwrap();
    (chart, surface, playback)
}

#[test]
fn properties_round_trip_and_default_to_a_plain_pie() {
    let (mut chart, _, _) = chart(Size::new(100.0, 100.0));
    assert_eq!(chart.inner_radius(), 0.0);
    assert_eq!(chart.segment_border_color(), Color::TRANSPARENT);

    chart.set_inner_radius(20.0);
    chart.set_insets(Insets::uniform(5.0));
    chart.set_segment_border_color(Color::WHITE);
    chart.set_segment_border_width(2.0);
    chart.set_scale(2.0);
    assert_eq!(chart.inner_radius(), 20.0);
    assert_eq!(chart.insets(), Insets::uniform(5.0));
    assert_eq!(chart.segment_border_color(), Color::WHITE);
    assert_eq!(chart.segment_border_width(), 2.0);
    assert_eq!(chart.scale(), 2.0);
}

#[test]
fn configuration_errors_are_reported_at_call_time() {
    let (mut chart, _, _) = chart(Size::new(100.0, 80.0));
    let err = chart.set_segments(&[1.0], &[Color::RED]).unwrap_err();
    assert!(err.to_string().contains("width and height don't match"));

    chart.set_insets(Insets {
        top: 0.0,
        left: 10.0,
        bottom: 0.0,
        right: 10.0,
    });
    assert!(chart.set_segments(&[1.0], &[Color::RED]).is_ok());
    assert!(chart.set_segments(&[0.5, 0.5], &[Color::RED]).is_err());

    chart.set_inner_radius(40.0);
    assert!(chart.set_segments(&[1.0], &[Color::RED]).unwrap_err().is_validation());
    chart.wait_idle().unwrap();
    assert_eq!(chart.phase(), ChartPhase::Idle);
}

#[test]
fn visibility_without_segments_is_a_no_op() {
    let (chart, surface, _) = chart(Size::new(50.0, 50.0));
    chart.display_chart().unwrap();
    chart.hide_chart().unwrap();
    chart.remove_chart().unwrap();
    assert!(surface.ops().is_empty());
}

#[test]
fn build_then_display_attaches_the_batch() {
    let (chart, surface, _) = chart(Size::new(50.0, 50.0));
    chart.set_segments(&[0.6, 0.4], &[Color::RED, Color::BLUE]).unwrap();
    chart.display_chart().unwrap();
    chart.wait_idle().unwrap();

    assert_eq!(chart.phase(), ChartPhase::Idle);
    assert_eq!(chart.segments().map(|b| b.len()), Some(2));
    assert!(surface.is_showing());
    assert_eq!(surface.ops(), vec![SurfaceOp::Attach(2), SurfaceOp::SetHidden(false)]);
}

#[test]
fn build_failures_keep_the_previous_batch() {
    let surface = Arc::new(InMemorySurface::new(Size::new(50.0, 50.0)));
    let playback = Arc::new(InMemoryPlayback::new());
    let opts = ChartOptions {
        backend: backend_factory(BackendKind::Cpu, CpuBackendOpts::default().with_max_pixels(100)),
        ..ChartOptions::default()
    };
    let chart = PieChart::with_options(surface, playback, Arc::new(InlineExecutor), opts).unwrap();
    chart.set_segments(&[1.0], &[Color::RED]).unwrap();
    chart.wait_idle().unwrap();
    assert!(chart.segments().is_none());
    assert_eq!(chart.phase(), ChartPhase::Idle);
}

#[test]
fn unsupported_reveal_is_rejected_before_queueing() {
    let (chart, _, playback) = chart(Size::new(50.0, 50.0));
    chart.set_segments(&[1.0], &[Color::RED]).unwrap();
    let err = chart
        .animate(
            AnimationRequest::new(1.0, RevealDirection::Clockwise)
                .with_style(RevealStyle::Simultaneous)
                .on_complete(|| panic!("must not complete")),
        )
        .unwrap_err();
    assert!(matches!(err, DonutError::Unsupported(_)));
    chart.wait_idle().unwrap();
    assert!(playback.started().is_empty());
}

#[test]
fn animate_without_segments_reports_failure() {
    let (chart, _, playback) = chart(Size::new(50.0, 50.0));
    let (tx, rx) = mpsc::channel();
    chart
        .animate(
            AnimationRequest::new(0.1, RevealDirection::Clockwise).on_failure(move |e| {
                tx.send(e.is_validation()).unwrap();
            }),
        )
        .unwrap();
    chart.wait_idle().unwrap();
    assert_eq!(rx.try_recv(), Ok(true));
    assert!(playback.started().is_empty());
}

#[test]
fn main_queue_defers_surface_work() {
    let surface = Arc::new(InMemorySurface::new(Size::new(30.0, 30.0)));
    let queue = Arc::new(MainQueue::new());
    let chart = PieChart::new(surface.clone(), Arc::new(InMemoryPlayback::new()), queue.clone())
        .unwrap();
    chart.set_segments(&[1.0], &[Color::GREEN]).unwrap();
    chart.display_chart().unwrap();
    chart.wait_idle().unwrap();

    assert!(surface.ops().is_empty());
    assert_eq!(queue.run_pending(), 1);
    assert!(surface.is_showing());
}
