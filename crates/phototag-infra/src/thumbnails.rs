//! Thumbnail rendering

use std::io::Cursor;
use std::path::Path;

use phototag_types::Result;

/// Render a bounded JPEG thumbnail of the image at `path`.
///
/// The aspect ratio is preserved; `size` bounds the longer edge. Alpha
/// channels are flattened since JPEG cannot carry them.
pub fn render_thumbnail(path: &Path, size: u32) -> Result<Vec<u8>> {
    let image = image::open(path)?;
    let thumbnail = image.thumbnail(size, size).to_rgb8();

    let mut buffer = Cursor::new(Vec::new());
    thumbnail.write_to(&mut buffer, image::ImageFormat::Jpeg)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_render_thumbnail_bounds_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let source: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(400, 200, Rgb([200, 10, 10]));
        source.save(&path).unwrap();

        let bytes = render_thumbnail(&path, 100).unwrap();
        let thumbnail = image::load_from_memory(&bytes).unwrap();
        assert!(thumbnail.width() <= 100);
        assert!(thumbnail.height() <= 100);
    }

    #[test]
    fn test_render_thumbnail_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(render_thumbnail(&path, 100).is_err());
    }
}
