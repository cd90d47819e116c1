use crate::foundation::error::{SheetError, SheetResult};
use crate::raster::buffer::PixelBuffer;

/// Straight (non-premultiplied) RGBA8 source-over, with the source alpha scaled by `opacity`.
///
/// A source landing on a transparent destination comes back unchanged, so copying a layer onto
/// a cleared buffer is lossless.
pub fn over(dst: [u8; 4], src: [u8; 4], opacity: f32) -> [u8; 4] {
    let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u32;
    let sa = div255(u32::from(src[3]) * op);
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    if sa == 255 || da == 0 {
        return [src[0], src[1], src[2], sa as u8];
    }

    // Channel weights in 255*255 units.
    let ws = sa * 255;
    let wd = da * (255 - sa);
    let wa = ws + wd;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = ((u32::from(src[i]) * ws + u32::from(dst[i]) * wd + wa / 2) / wa) as u8;
    }
    out[3] = div255(wa) as u8;
    out
}

/// Composite `src` over `dst` with `src`'s top-left corner at `(x, y)` in `dst` space.
///
/// Source pixels falling outside `dst` are dropped.
pub fn over_at(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: i64,
    y: i64,
    opacity: f32,
) -> SheetResult<()> {
    if dst.bytes_per_pixel() != 4 || src.bytes_per_pixel() != 4 {
        return Err(SheetError::validation(
            "over_at expects rgba8 buffers on both sides",
        ));
    }

    let d = dst.size();
    let s = src.size();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(s.width)).min(i64::from(d.width));
    let y1 = (y + i64::from(s.height)).min(i64::from(d.height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = (x1 - x0) as usize * 4;
    let d_stride = d.width as usize * 4;
    let s_stride = s.width as usize * 4;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for yy in y0..y1 {
        let si = (yy - y) as usize * s_stride + (x0 - x) as usize * 4;
        let di = yy as usize * d_stride + x0 as usize * 4;
        let s_row = src_data[si..si + span].chunks_exact(4);
        let d_row = dst_data[di..di + span].chunks_exact_mut(4);
        for (dp, sp) in d_row.zip(s_row) {
            let blended = over(
                [dp[0], dp[1], dp[2], dp[3]],
                [sp[0], sp[1], sp[2], sp[3]],
                opacity,
            );
            dp.copy_from_slice(&blended);
        }
    }
    Ok(())
}

fn div255(x: u32) -> u32 {
    (x + 127) / 255
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
