use crate::foundation::core::{PixelRect, PixelSize};
use crate::foundation::error::{SheetError, SheetResult};

/// Owned raster surface: tightly packed rows of `bytes_per_pixel`-sized pixels.
///
/// The buffer is agnostic of channel layout; only [`PixelBuffer::alpha_bounds_rgba8`] assumes
/// RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed (fully transparent) buffer.
    pub fn new(size: PixelSize, bytes_per_pixel: usize) -> SheetResult<Self> {
        let len = byte_len(size, bytes_per_pixel)?;
        Ok(Self {
            width: size.width,
            height: size.height,
            bytes_per_pixel,
            data: vec![0; len],
        })
    }

    pub fn from_raw(size: PixelSize, bytes_per_pixel: usize, data: Vec<u8>) -> SheetResult<Self> {
        let len = byte_len(size, bytes_per_pixel)?;
        if data.len() != len {
            return Err(SheetError::validation(format!(
                "pixel buffer {}x{}x{} expects {len} bytes, got {}",
                size.width,
                size.height,
                bytes_per_pixel,
                data.len()
            )));
        }
        Ok(Self {
            width: size.width,
            height: size.height,
            bytes_per_pixel,
            data,
        })
    }

    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn row_stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel
    }

    /// Copy the pixels covered by `rect` into a new packed buffer.
    ///
    /// Pixels of `rect` outside the buffer read as zero. Empty rectangles yield no bytes.
    pub fn read_region(&self, rect: PixelRect) -> Vec<u8> {
        let Some(size) = rect.size() else {
            return Vec::new();
        };
        let bpp = self.bytes_per_pixel;
        let out_stride = size.width as usize * bpp;
        let mut out = vec![0u8; out_stride * size.height as usize];

        let Some((x0, x1)) = clip_span(rect.left, rect.right, self.width) else {
            return out;
        };
        let Some((y0, y1)) = clip_span(rect.top, rect.bottom, self.height) else {
            return out;
        };

        let run = (x1 - x0 + 1) as usize * bpp;
        let dst_col = (x0 - rect.left) as usize * bpp;
        for y in y0..=y1 {
            let src_off = y as usize * self.row_stride() + x0 as usize * bpp;
            let dst_off = (y - rect.top) as usize * out_stride + dst_col;
            out[dst_off..dst_off + run].copy_from_slice(&self.data[src_off..src_off + run]);
        }
        out
    }

    /// Overwrite the `size` region whose top-left corner is at `(x, y)` with packed `src` pixels.
    ///
    /// No blending: destination bytes are replaced. Parts of the region outside the buffer are
    /// dropped.
    pub fn write_region(&mut self, x: i64, y: i64, size: PixelSize, src: &[u8]) -> SheetResult<()> {
        let bpp = self.bytes_per_pixel;
        let src_stride = size.width as usize * bpp;
        if src.len() != src_stride * size.height as usize {
            return Err(SheetError::validation(format!(
                "region {}x{} expects {} bytes, got {}",
                size.width,
                size.height,
                src_stride * size.height as usize,
                src.len()
            )));
        }
        if size.area() == 0 {
            return Ok(());
        }

        let rect = PixelRect::from_xywh(x, y, i64::from(size.width), i64::from(size.height));
        let Some((x0, x1)) = clip_span(rect.left, rect.right, self.width) else {
            return Ok(());
        };
        let Some((y0, y1)) = clip_span(rect.top, rect.bottom, self.height) else {
            return Ok(());
        };

        let run = (x1 - x0 + 1) as usize * bpp;
        let src_col = (x0 - x) as usize * bpp;
        let stride = self.row_stride();
        for yy in y0..=y1 {
            let src_off = (yy - y) as usize * src_stride + src_col;
            let dst_off = yy as usize * stride + x0 as usize * bpp;
            self.data[dst_off..dst_off + run].copy_from_slice(&src[src_off..src_off + run]);
        }
        Ok(())
    }

    /// Smallest rectangle enclosing every pixel with non-zero alpha, for RGBA8 buffers.
    ///
    /// Returns [`PixelRect::NULL`] when the buffer is fully transparent.
    pub fn alpha_bounds_rgba8(&self) -> SheetResult<PixelRect> {
        if self.bytes_per_pixel != 4 {
            return Err(SheetError::validation(format!(
                "alpha bounds need 4 bytes per pixel, buffer has {}",
                self.bytes_per_pixel
            )));
        }

        let mut bounds: Option<PixelRect> = None;
        let stride = self.row_stride();
        for y in 0..self.height as usize {
            let row = &self.data[y * stride..(y + 1) * stride];
            let mut first = None;
            let mut last = None;
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] != 0 {
                    first.get_or_insert(x);
                    last = Some(x);
                }
            }
            let (Some(first), Some(last)) = (first, last) else {
                continue;
            };
            let row_rect = PixelRect::from_ltrb(first as i64, y as i64, last as i64, y as i64);
            bounds = Some(match bounds {
                Some(b) => b.expanded_to(row_rect),
                None => row_rect,
            });
        }
        Ok(bounds.unwrap_or(PixelRect::NULL))
    }
}

fn byte_len(size: PixelSize, bytes_per_pixel: usize) -> SheetResult<usize> {
    if bytes_per_pixel == 0 {
        return Err(SheetError::validation("bytes per pixel must be > 0"));
    }
    (size.width as usize)
        .checked_mul(size.height as usize)
        .and_then(|px| px.checked_mul(bytes_per_pixel))
        .ok_or_else(|| {
            SheetError::validation(format!(
                "pixel buffer {}x{} is too large",
                size.width, size.height
            ))
        })
}

/// Clip the inclusive span `[lo, hi]` to `[0, extent)`.
fn clip_span(lo: i64, hi: i64, extent: u32) -> Option<(i64, i64)> {
    let lo = lo.max(0);
    let hi = hi.min(i64::from(extent) - 1);
    (lo <= hi).then_some((lo, hi))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
