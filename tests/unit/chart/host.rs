use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn in_memory_surface_tracks_state_and_ops() {
    let surface = InMemorySurface::new(Size::new(10.0, 10.0));
    assert!(!surface.is_showing());
    surface.set_hidden(true);
    surface.detach();
    assert_eq!(surface.ops(), vec![SurfaceOp::SetHidden(true), SurfaceOp::Detach]);
    assert!(surface.is_hidden());

    surface.set_bounds(Size::new(20.0, 20.0));
    assert_eq!(surface.bounds(), Size::new(20.0, 20.0));
}

#[test]
fn inline_executor_runs_immediately() {
    let n = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&n);
    InlineExecutor.dispatch(Box::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(n.load(Ordering::SeqCst), 1);
}

#[test]
fn main_queue_defers_until_drained_in_order() {
    let queue = Arc::new(MainQueue::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    for i in 0..3 {
        let log = Arc::clone(&log);
        queue.dispatch(Box::new(move || log.lock().unwrap().push(i)));
    }
    assert_eq!(queue.pending(), 3);
    assert!(log.lock().unwrap().is_empty());

    assert_eq!(queue.run_pending(), 3);
    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(queue.run_pending(), 0);
}

#[test]
fn main_queue_runs_jobs_dispatched_while_draining() {
    let queue = Arc::new(MainQueue::new());
    let n = Arc::new(AtomicUsize::new(0));
    let (q, c) = (Arc::clone(&queue), Arc::clone(&n));
    queue.dispatch(Box::new(move || {
        let c2 = Arc::clone(&c);
        q.dispatch(Box::new(move || {
            c2.fetch_add(1, Ordering::SeqCst);
        }));
    }));
    assert_eq!(queue.run_pending(), 2);
    assert_eq!(n.load(Ordering::SeqCst), 1);
}
