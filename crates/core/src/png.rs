use std::io;

use crate::PixelBuffer;

/// An error that might occur while writing a preview snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// An I/O error occured.
    Io(io::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Io(ref err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl PixelBuffer {
    /// Writes the buffer to the provided writer as an RGBA PNG image.
    ///
    /// This is a debugging/archiving aid: it lets a consumer persist the
    /// preview a given seed produced without involving any rendering
    /// resource.
    pub fn write_png(&self, writer: impl io::Write) -> Result<(), SnapshotError> {
        let mut encoder = png::Encoder::new(writer, self.size().x, self.size().y);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut png_writer = encoder.write_header().map_err(map_error)?;
        png_writer
            .write_image_data(bytemuck::cast_slice(self.as_colors()))
            .map_err(map_error)?;
        png_writer.finish().map_err(map_error)
    }
}

/// Maps the provided error to a [`SnapshotError`].
fn map_error(err: png::EncodingError) -> SnapshotError {
    match err {
        png::EncodingError::IoError(io) => SnapshotError::Io(io),
        other => panic!("invalid PNG encoding parameters: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use crate::{Color, PixelBuffer};

    #[test]
    fn writes_a_png_signature() {
        let mut buf = PixelBuffer::new(UVec2::new(2, 2));
        buf.set_pixel(0, 0, Color::RED);

        let mut out = Vec::new();
        buf.write_png(&mut out).unwrap();
        assert_eq!(&out[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);
    }
}
