use super::*;
use crate::encode::sequence::{FrameOrder, NoProgress};
use crate::foundation::core::PixelBuffer;
use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

fn decode(bytes: &[u8]) -> Vec<ImageFrame> {
    let decoder = GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    decoder.into_frames().collect_frames().unwrap()
}

fn has_loop_extension(bytes: &[u8]) -> bool {
    bytes.windows(11).any(|w| w == b"NETSCAPE2.0")
}

fn frames() -> Vec<Frame> {
    vec![
        PixelBuffer::filled(8, 6, [255, 0, 0, 255]).unwrap(),
        PixelBuffer::filled(8, 6, [0, 255, 0, 255]).unwrap(),
        PixelBuffer::filled(8, 6, [0, 0, 255, 255]).unwrap(),
    ]
}

#[test]
fn gif_has_one_frame_per_input_with_delay() {
    let bytes = encode_gif(&frames(), &EncodeOpts::default(), &mut NoProgress).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(bytes.last(), Some(&0x3B));
    assert!(has_loop_extension(&bytes));

    let decoded = decode(&bytes);
    assert_eq!(decoded.len(), 3);
    for f in &decoded {
        assert_eq!(f.buffer().dimensions(), (8, 6));
        let (num, den) = f.delay().numer_denom_ms();
        assert_eq!(f64::from(num) / f64::from(den), 150.0);
    }
    assert_eq!(decoded[0].buffer().get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded[2].buffer().get_pixel(7, 5).0, [0, 0, 255, 255]);
}

#[test]
fn ping_pong_gif_doubles_minus_two() {
    let opts = EncodeOpts {
        order: FrameOrder::PingPong,
        ..EncodeOpts::default()
    };
    let bytes = encode_gif(&frames(), &opts, &mut NoProgress).unwrap();
    let decoded = decode(&bytes);
    assert_eq!(decoded.len(), 4);
    assert_eq!(decoded[3].buffer().get_pixel(0, 0).0, [0, 255, 0, 255]);
}

#[test]
fn single_pass_gif_has_no_loop_extension() {
    let opts = EncodeOpts {
        loop_forever: false,
        ..EncodeOpts::default()
    };
    let bytes = encode_gif(&frames(), &opts, &mut NoProgress).unwrap();
    assert!(!has_loop_extension(&bytes));
    assert_eq!(decode(&bytes).len(), 3);
}

#[test]
fn transparent_padding_survives_encoding() {
    let mut data = vec![0u8; 4 * 4 * 4];
    for px in data.chunks_exact_mut(4).take(8) {
        px.copy_from_slice(&[10, 200, 30, 255]);
    }
    let frame = PixelBuffer::from_rgba8(4, 4, data).unwrap();
    let bytes = encode_gif(
        &[frame.clone(), frame],
        &EncodeOpts::default(),
        &mut NoProgress,
    )
    .unwrap();

    let decoded = decode(&bytes);
    assert_eq!(decoded[0].buffer().get_pixel(0, 3).0[3], 0);
    assert_eq!(decoded[0].buffer().get_pixel(0, 0).0[3], 255);
}

#[test]
fn finish_twice_is_an_error() {
    let mut bytes = Vec::new();
    let mut enc = GifFrameEncoder::new(&mut bytes, 10, true).unwrap();
    enc.append_frame(&frames()[0], 100).unwrap();
    enc.finish().unwrap();
    assert!(matches!(enc.finish(), Err(WiggleError::EncodingFailed(_))));
    assert!(matches!(
        enc.append_frame(&frames()[0], 100),
        Err(WiggleError::EncodingFailed(_))
    ));
}

#[test]
fn invalid_speed_is_rejected() {
    assert!(GifFrameEncoder::new(Vec::new(), 0, true).is_err());
}

/// Accepts `budget` bytes, then fails every write.
struct FlakyWriter {
    budget: usize,
    written: Vec<u8>,
}

impl Write for FlakyWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.written.len() + buf.len() > self.budget {
            return Err(std::io::Error::other("disk full"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn failing_writer_surfaces_at_finish() {
    let mut enc = GifFrameEncoder::new(
        FlakyWriter {
            budget: 16,
            written: Vec::new(),
        },
        10,
        true,
    )
    .unwrap();
    enc.append_frame(&frames()[0], 150).unwrap();
    enc.append_frame(&frames()[1], 150).unwrap();

    let err = enc.finish().unwrap_err();
    assert!(matches!(err, WiggleError::EncodingFailed(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn failing_writer_fails_the_whole_run() {
    let mut enc = GifFrameEncoder::new(
        FlakyWriter {
            budget: 0,
            written: Vec::new(),
        },
        10,
        false,
    )
    .unwrap();
    let err = encode_frames(&frames(), &EncodeOpts::default(), &mut enc, &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, WiggleError::EncodingFailed(_)));
    assert_eq!(enc.appended(), 3);
}

#[test]
fn finish_without_frames_is_an_error() {
    let mut bytes = Vec::new();
    let mut enc = GifFrameEncoder::new(&mut bytes, 10, true).unwrap();
    assert!(matches!(enc.finish(), Err(WiggleError::EncodingFailed(_))));
    drop(enc);
    assert!(bytes.is_empty());
}

#[test]
fn sub_centisecond_delay_is_raised_to_gif_minimum() {
    let opts = EncodeOpts {
        frame_delay_ms: 4,
        ..EncodeOpts::default()
    };
    let decoded = decode(&encode_gif(&frames(), &opts, &mut NoProgress).unwrap());
    for f in &decoded {
        let (num, den) = f.delay().numer_denom_ms();
        assert_eq!(f64::from(num) / f64::from(den), 10.0);
    }
}
