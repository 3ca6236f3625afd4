use crate::error::ZonexError;

/// A grayscale page raster, 8 bits per pixel, row-major.
///
/// Kept deliberately minimal: rendered pages only exist to be cut into
/// vertical strips and handed to OCR, so a bare byte buffer plus the
/// binary PGM (P5) codec covers everything the pipeline needs.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl PageImage {
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, ZonexError> {
        if pixels.len() != width * height {
            return Err(ZonexError::Extraction(format!(
                "raster size mismatch: {}x{} needs {} bytes, got {}",
                width,
                height,
                width * height,
                pixels.len()
            )));
        }
        Ok(PageImage {
            width,
            height,
            pixels,
        })
    }

    /// Decode a binary PGM (P5) image as produced by `pdftoppm -gray`.
    pub fn from_pgm(data: &[u8]) -> Result<Self, ZonexError> {
        let mut cursor = 0usize;

        let magic = next_token(data, &mut cursor)
            .ok_or_else(|| ZonexError::Extraction("truncated PGM header".into()))?;
        if magic != b"P5" {
            return Err(ZonexError::Extraction(format!(
                "expected P5 raster, got magic '{}'",
                String::from_utf8_lossy(magic)
            )));
        }

        let width = next_usize(data, &mut cursor)?;
        let height = next_usize(data, &mut cursor)?;
        let maxval = next_usize(data, &mut cursor)?;
        if maxval == 0 || maxval > 255 {
            return Err(ZonexError::Extraction(format!(
                "unsupported PGM maxval {maxval}"
            )));
        }

        // Exactly one whitespace byte separates the header from pixel data.
        cursor += 1;
        let expected = width * height;
        if data.len() < cursor + expected {
            return Err(ZonexError::Extraction(format!(
                "truncated PGM pixel data: need {expected} bytes, got {}",
                data.len().saturating_sub(cursor)
            )));
        }

        PageImage::new(width, height, data[cursor..cursor + expected].to_vec())
    }

    /// Encode as binary PGM (P5), the format tesseract reads directly.
    pub fn to_pgm(&self) -> Vec<u8> {
        let mut out = format!("P5\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.pixels);
        out
    }

    /// Crop a horizontal pixel range `[left, right)` across the full height.
    pub fn crop_columns(&self, left: usize, right: usize) -> PageImage {
        let left = left.min(self.width);
        let right = right.clamp(left, self.width);
        let strip_width = right - left;
        let mut pixels = Vec::with_capacity(strip_width * self.height);
        for row in 0..self.height {
            let start = row * self.width + left;
            pixels.extend_from_slice(&self.pixels[start..start + strip_width]);
        }
        PageImage {
            width: strip_width,
            height: self.height,
            pixels,
        }
    }

    /// Cut the page into `n` equal vertical strips with a small horizontal
    /// overlap so glyphs straddling a cut line land in both strips rather
    /// than neither.
    pub fn vertical_strips(&self, n: usize, overlap: usize) -> Vec<PageImage> {
        if n <= 1 {
            return vec![self.clone()];
        }
        let strip_width = self.width / n;
        (0..n)
            .map(|i| {
                let left = (i * strip_width).saturating_sub(overlap);
                let right = if i + 1 == n {
                    self.width
                } else {
                    ((i + 1) * strip_width + overlap).min(self.width)
                };
                self.crop_columns(left, right)
            })
            .collect()
    }
}

/// Next whitespace-delimited token, skipping `#` comment lines.
fn next_token<'a>(data: &'a [u8], cursor: &mut usize) -> Option<&'a [u8]> {
    loop {
        while *cursor < data.len() && data[*cursor].is_ascii_whitespace() {
            *cursor += 1;
        }
        if *cursor < data.len() && data[*cursor] == b'#' {
            while *cursor < data.len() && data[*cursor] != b'\n' {
                *cursor += 1;
            }
            continue;
        }
        break;
    }
    if *cursor >= data.len() {
        return None;
    }
    let start = *cursor;
    while *cursor < data.len() && !data[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
    Some(&data[start..*cursor])
}

fn next_usize(data: &[u8], cursor: &mut usize) -> Result<usize, ZonexError> {
    let token = next_token(data, cursor)
        .ok_or_else(|| ZonexError::Extraction("truncated PGM header".into()))?;
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            ZonexError::Extraction(format!(
                "invalid PGM header field '{}'",
                String::from_utf8_lossy(token)
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PageImage {
        let pixels = (0..width * height).map(|i| (i % 251) as u8).collect();
        PageImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_pgm_round_trip() {
        let img = gradient(17, 9);
        let decoded = PageImage::from_pgm(&img.to_pgm()).unwrap();
        assert_eq!(decoded.width, 17);
        assert_eq!(decoded.height, 9);
        assert_eq!(decoded.pixels, img.pixels);
    }

    #[test]
    fn test_pgm_with_comment() {
        let mut data = b"P5\n# rendered by pdftoppm\n4 2\n255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let img = PageImage::from_pgm(&data).unwrap();
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 2);
        assert_eq!(img.pixels, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pgm_rejects_wrong_magic() {
        assert!(PageImage::from_pgm(b"P6\n2 2\n255\n0000").is_err());
    }

    #[test]
    fn test_pgm_rejects_truncated_pixels() {
        assert!(PageImage::from_pgm(b"P5\n4 2\n255\n123").is_err());
    }

    #[test]
    fn test_crop_columns() {
        let img = PageImage::new(4, 2, vec![0, 1, 2, 3, 10, 11, 12, 13]).unwrap();
        let crop = img.crop_columns(1, 3);
        assert_eq!(crop.width, 2);
        assert_eq!(crop.pixels, vec![1, 2, 11, 12]);
    }

    #[test]
    fn test_three_strips_cover_page() {
        let img = gradient(300, 4);
        let strips = img.vertical_strips(3, 5);
        assert_eq!(strips.len(), 3);
        // First strip cannot extend left of the page; middle gets both overlaps.
        assert_eq!(strips[0].width, 105);
        assert_eq!(strips[1].width, 110);
        assert_eq!(strips[2].width, 105);
        for strip in &strips {
            assert_eq!(strip.height, 4);
        }
    }

    #[test]
    fn test_single_strip_is_whole_page() {
        let img = gradient(50, 3);
        let strips = img.vertical_strips(1, 5);
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0].width, 50);
    }
}
