use super::*;
use crate::foundation::core::Point;

fn session() -> AnchorSession {
    let image = PixelBuffer::filled(300, 100, [40, 80, 120, 255]).unwrap();
    AnchorSession::from_source(&image, 3).unwrap()
}

#[test]
fn starts_on_default_anchors() {
    let s = session();
    assert_eq!(s.len(), 3);
    assert_eq!(s.current_index(), 0);
    for i in 0..3 {
        assert_eq!(s.default_anchor(i).unwrap(), Point::new(50.0, 50.0));
        assert_eq!(s.anchor(i).unwrap(), Point::new(50.0, 50.0));
    }
}

#[test]
fn set_and_reset_anchor() {
    let mut s = session();
    s.set_anchor(2, Point::new(61.5, 40.0)).unwrap();
    assert_eq!(s.anchor(2).unwrap(), Point::new(61.5, 40.0));
    assert_eq!(s.default_anchor(2).unwrap(), Point::new(50.0, 50.0));

    s.reset_anchor(2).unwrap();
    assert_eq!(s.anchor(2).unwrap(), Point::new(50.0, 50.0));
}

#[test]
fn bad_index_or_anchor_is_rejected() {
    let mut s = session();
    assert!(matches!(
        s.set_anchor(3, Point::ZERO),
        Err(WiggleError::Validation(_))
    ));
    assert!(s.default_anchor(7).is_err());
    assert!(s.set_anchor(0, Point::new(f64::INFINITY, 1.0)).is_err());
}

#[test]
fn confirm_walks_segments_then_reports_ready() {
    let mut s = session();
    assert!(s.previous().is_none());
    assert!(s.onion_skin().unwrap().is_none());

    s.set_current_anchor(Point::new(40.0, 50.0)).unwrap();
    assert_eq!(s.confirm(), Step::Next(1));
    assert_eq!(s.previous().unwrap().anchor(), Point::new(40.0, 50.0));

    s.set_current_anchor(Point::new(60.0, 50.0)).unwrap();
    let preview = s.onion_skin().unwrap().unwrap();
    // offsets -10 / +10 around the mean anchor
    assert_eq!((preview.width(), preview.height()), (120, 100));

    assert_eq!(s.confirm(), Step::Next(2));
    assert_eq!(s.confirm(), Step::Ready);
    assert_eq!(s.confirm(), Step::Ready);
    assert_eq!(
        s.anchors(),
        vec![
            Point::new(40.0, 50.0),
            Point::new(60.0, 50.0),
            Point::new(50.0, 50.0)
        ]
    );
}

#[test]
fn freeze_produces_a_run_with_the_refined_anchors() {
    let mut s = session();
    s.set_anchor(1, Point::new(55.0, 52.0)).unwrap();
    let run = s.freeze(WiggleOpts::default()).unwrap();
    assert_eq!(run.segments()[1].anchor(), Point::new(55.0, 52.0));
}

#[test]
fn onion_preview_blends_current_over_previous_at_half_opacity() {
    let red = PixelBuffer::filled(10, 10, [200, 0, 0, 255]).unwrap();
    let blue = PixelBuffer::filled(10, 10, [0, 0, 100, 255]).unwrap();
    let prev = Segment::with_default_anchor(red);
    let cur = Segment::with_default_anchor(blue);
    let mut s = AnchorSession::new(vec![prev, cur]).unwrap();
    s.confirm();

    let preview = s.onion_skin().unwrap().unwrap();
    assert_eq!(preview.pixel(5, 5).unwrap(), [100, 0, 50, 255]);
}

#[test]
fn is_empty_is_false_for_any_session() {
    assert!(!session().is_empty());
}

#[test]
fn single_segment_session_is_rejected() {
    let seg = Segment::with_default_anchor(PixelBuffer::filled(2, 2, [0; 4]).unwrap());
    assert!(matches!(
        AnchorSession::new(vec![seg]),
        Err(WiggleError::MismatchedInputs { .. })
    ));
}
