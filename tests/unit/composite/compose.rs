use super::*;
use crate::foundation::core::{Point, Vec2};
use crate::slice::slice;

fn coded(width: u32, height: u32, tag: u8) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, tag, 255]);
        }
    }
    PixelBuffer::from_rgba8(width, height, data).unwrap()
}

#[test]
fn centered_anchors_reproduce_segments() {
    let source = coded(300, 100, 7);
    let segments = slice(&source, 3).unwrap();
    let frames = compose(&segments);

    assert_eq!(frames.len(), 3);
    for (frame, seg) in frames.iter().zip(&segments) {
        assert_eq!((frame.width(), frame.height()), (100, 100));
        assert_eq!(frame, seg.buffer());
    }
}

#[test]
fn frames_share_dimensions_and_follow_input_order() {
    let segments = vec![
        Segment::new(coded(100, 100, 1), Point::new(50.0, 50.0)),
        Segment::new(coded(100, 100, 2), Point::new(70.0, 50.0)),
        Segment::new(coded(101, 100, 3), Point::new(45.0, 58.0)),
    ];
    let frames = compose(&segments);

    assert_eq!(frames.len(), 3);
    let (w, h) = (frames[0].width(), frames[0].height());
    assert!(frames.iter().all(|f| f.width() == w && f.height() == h));

    let sizes = segments
        .iter()
        .map(|s| s.buffer().size())
        .collect::<Vec<_>>();
    let anchors = segments.iter().map(Segment::anchor).collect::<Vec<_>>();
    let layout = plan_layout(&sizes, &anchors).unwrap();
    for (i, frame) in frames.iter().enumerate() {
        let (x, y) = layout.pixel_origin(i).unwrap();
        let px = frame.pixel(x as u32, y as u32).unwrap();
        assert_eq!(px, [0, 0, (i + 1) as u8, 255]);
    }
}

#[test]
fn two_segment_example_places_pixels() {
    let segments = vec![
        Segment::new(coded(100, 100, 1), Point::new(50.0, 50.0)),
        Segment::new(coded(100, 100, 2), Point::new(70.0, 50.0)),
    ];
    let frames = compose(&segments);
    assert_eq!(frames.len(), 2);
    assert_eq!((frames[0].width(), frames[0].height()), (120, 100));

    // segment 0 starts at x=20, segment 1 at x=0
    assert_eq!(frames[0].pixel(19, 10), Some([0, 0, 0, 0]));
    assert_eq!(frames[0].pixel(20, 10), Some([0, 10, 1, 255]));
    assert_eq!(frames[1].pixel(0, 10), Some([0, 10, 2, 255]));
    assert_eq!(frames[1].pixel(100, 10), Some([0, 0, 0, 0]));

    // both anchors land on the same frame pixel
    assert_eq!(frames[0].pixel(70, 50), Some([50, 50, 1, 255]));
    assert_eq!(frames[1].pixel(70, 50), Some([70, 50, 2, 255]));
}

#[test]
fn compose_is_translation_invariant() {
    let buffers = vec![coded(60, 40, 1), coded(60, 40, 2), coded(61, 40, 3)];
    let anchors = vec![
        Point::new(30.0, 20.0),
        Point::new(24.0, 23.0),
        Point::new(36.0, 18.0),
    ];
    let base = compose_parts(&buffers, &anchors);

    let delta = Vec2::new(-8.0, 5.0);
    let moved = anchors.iter().map(|a| *a + delta).collect::<Vec<_>>();
    let shifted = compose_parts(&buffers, &moved);

    assert_eq!(base, shifted);
}

#[test]
fn compose_is_translation_invariant_on_half_pixels() {
    let buffers = vec![coded(50, 60, 1), coded(41, 45, 2), coded(55, 51, 3)];
    let anchors = vec![
        Point::new(36.375, 41.625),
        Point::new(6.875, 2.5),
        Point::new(43.875, 6.125),
    ];
    let base = compose_parts(&buffers, &anchors);
    assert_eq!(base.len(), 3);

    for delta in [
        Vec2::new(-22.0, 11.0),
        Vec2::new(3.0, -1.0),
        Vec2::new(0.5, 0.5),
        Vec2::new(-0.125, 7.25),
    ] {
        let moved = anchors.iter().map(|a| *a + delta).collect::<Vec<_>>();
        assert_eq!(base, compose_parts(&buffers, &moved), "delta {delta:?}");
    }
}

#[test]
fn odd_width_default_anchors_line_up_exactly() {
    let segments = vec![
        Segment::with_default_anchor(coded(61, 41, 1)),
        Segment::with_default_anchor(coded(61, 41, 2)),
        Segment::with_default_anchor(coded(61, 41, 3)),
    ];
    let frames = compose(&segments);
    for (frame, seg) in frames.iter().zip(&segments) {
        assert_eq!(frame, seg.buffer());
    }
}

#[test]
fn mismatched_inputs_yield_no_frames() {
    let buffers = vec![coded(4, 4, 1), coded(4, 4, 2), coded(4, 4, 3)];
    let anchors = vec![Point::new(2.0, 2.0); 2];

    assert!(compose_parts(&buffers, &anchors).is_empty());
    assert!(matches!(
        try_compose_parts(&buffers, &anchors),
        Err(WiggleError::MismatchedInputs {
            segments: 3,
            anchors: 2
        })
    ));
    assert!(compose(&[Segment::with_default_anchor(coded(4, 4, 1))]).is_empty());
}

#[test]
fn onion_skin_blends_current_over_previous() {
    let prev = Segment::new(
        PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap(),
        Point::new(5.0, 5.0),
    );
    let cur = Segment::new(
        PixelBuffer::filled(10, 10, [255, 255, 255, 255]).unwrap(),
        Point::new(5.0, 5.0),
    );
    let preview = onion_skin(&prev, &cur, ONION_SKIN_OPACITY).unwrap();

    assert_eq!((preview.width(), preview.height()), (10, 10));
    let px = preview.pixel(5, 5).unwrap();
    assert_eq!(px[3], 255);
    assert!(px[0].abs_diff(128) <= 1, "{px:?}");
}

#[test]
fn onion_skin_aligns_anchors() {
    let prev = Segment::new(
        PixelBuffer::filled(10, 10, [0, 0, 0, 255]).unwrap(),
        Point::new(2.0, 5.0),
    );
    let cur = Segment::new(
        PixelBuffer::filled(10, 10, [255, 0, 0, 255]).unwrap(),
        Point::new(8.0, 5.0),
    );
    let preview = onion_skin(&prev, &cur, 1.0).unwrap();

    // offsets are +3 / -3, so the frame is 16 wide
    assert_eq!((preview.width(), preview.height()), (16, 10));
    assert_eq!(preview.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(preview.pixel(15, 0), Some([0, 0, 0, 255]));
}
