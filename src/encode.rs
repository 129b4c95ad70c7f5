use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat};
use std::io::Cursor;

/// NeuQuant quantizer speed (1 = best quality, 30 = fastest).
const QUANTIZER_SPEED: i32 = 10;

/// Errors raised while assembling the output animation.
#[derive(thiserror::Error, Debug)]
pub(crate) enum EncodeError {
    #[error("captured frame could not be decoded: {0}")]
    BadFrame(image::ImageError),

    #[error("frame {index} is {actual_width}x{actual_height}, expected {width}x{height}")]
    FrameSize { index: usize, actual_width: u32, actual_height: u32, width: u32, height: u32 },

    #[error("gif encoding failed: {0}")]
    Encode(image::ImageError),
}

/// Accumulates captured frames and encodes them into a looping GIF.
pub(crate) struct GifAssembler {
    width: u32,
    height: u32,
    delay_ms: u32,
    frames: Vec<Frame>,
}

impl GifAssembler {
    pub(crate) fn new(width: u32, height: u32, delay_ms: u32) -> Self {
        Self { width, height, delay_ms, frames: Vec::new() }
    }

    /// Append one captured PNG frame. Frames must all match the target
    /// dimensions; the capture clip is fixed for the whole run.
    pub(crate) fn push_png(&mut self, png: &[u8]) -> Result<(), EncodeError> {
        let image = image::load_from_memory_with_format(png, ImageFormat::Png)
            .map_err(EncodeError::BadFrame)?
            .to_rgba8();
        if image.width() != self.width || image.height() != self.height {
            return Err(EncodeError::FrameSize {
                index: self.frames.len(),
                actual_width: image.width(),
                actual_height: image.height(),
                width: self.width,
                height: self.height,
            });
        }
        let delay = Delay::from_numer_denom_ms(self.delay_ms, 1);
        self.frames.push(Frame::from_parts(image, 0, 0, delay));
        Ok(())
    }

    /// Quantize and encode all frames into an endlessly looping GIF,
    /// returning the payload for the caller to persist.
    pub(crate) fn finish(self) -> Result<Vec<u8>, EncodeError> {
        let mut payload = Cursor::new(Vec::new());
        {
            let mut encoder = GifEncoder::new_with_speed(&mut payload, QUANTIZER_SPEED);
            encoder.set_repeat(Repeat::Infinite).map_err(EncodeError::Encode)?;
            encoder.encode_frames(self.frames).map_err(EncodeError::Encode)?;
        }
        Ok(payload.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba, RgbaImage};

    fn png_frame(width: u32, height: u32, tint: u8) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([tint, 64, 128, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).expect("encode png");
        bytes.into_inner()
    }

    #[test]
    fn test_payload_is_a_looping_gif() {
        let mut assembler = GifAssembler::new(8, 6, 50);
        assembler.push_png(&png_frame(8, 6, 10)).expect("frame 1");
        assembler.push_png(&png_frame(8, 6, 200)).expect("frame 2");

        let payload = assembler.finish().expect("finish");
        assert!(payload.starts_with(b"GIF89a"));

        let decoder = GifDecoder::new(Cursor::new(&payload)).expect("decode");
        assert_eq!(decoder.into_frames().count(), 2);
    }

    #[test]
    fn test_mismatched_frame_is_rejected() {
        let mut assembler = GifAssembler::new(8, 6, 50);
        assembler.push_png(&png_frame(8, 6, 10)).expect("frame 1");
        let err = assembler.push_png(&png_frame(9, 6, 10)).expect_err("size mismatch accepted");
        assert!(matches!(err, EncodeError::FrameSize { index: 1, .. }));
    }

    #[test]
    fn test_garbage_frame_is_rejected() {
        let mut assembler = GifAssembler::new(8, 6, 50);
        let err = assembler.push_png(b"not a png").expect_err("garbage accepted");
        assert!(matches!(err, EncodeError::BadFrame(_)));
    }
}
