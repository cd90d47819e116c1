use super::*;
use crate::foundation::core::PixelSize;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_at_places_and_clips() {
    let mut dst = PixelBuffer::new(PixelSize { width: 3, height: 2 }, 4).unwrap();
    let src = PixelBuffer::from_raw(
        PixelSize { width: 2, height: 1 },
        4,
        vec![255, 0, 0, 255, 0, 255, 0, 255],
    )
    .unwrap();

    over_at(&mut dst, &src, 2, 1, 1.0).unwrap();
    let data = dst.data();
    // Only the first source pixel lands at (2, 1); the second falls off the right edge.
    assert_eq!(&data[(3 + 2) * 4..(3 + 2) * 4 + 4], &[255, 0, 0, 255]);
    assert_eq!(data.iter().filter(|&&b| b != 0).count(), 2);

    over_at(&mut dst, &src, -5, 0, 1.0).unwrap();
    assert_eq!(dst.data().iter().filter(|&&b| b != 0).count(), 2);
}

#[test]
fn over_at_rejects_non_rgba8() {
    let mut dst = PixelBuffer::new(PixelSize { width: 1, height: 1 }, 2).unwrap();
    let src = PixelBuffer::new(PixelSize { width: 1, height: 1 }, 4).unwrap();
    assert!(over_at(&mut dst, &src, 0, 0, 1.0).is_err());
}

#[test]
fn over_dst_transparent_keeps_semi_transparent_src_exactly() {
    let src = [200, 100, 50, 128];
    assert_eq!(over([0, 0, 0, 0], src, 1.0), src);
}

#[test]
fn over_opacity_scales_src_alpha_only() {
    assert_eq!(over([0, 0, 0, 0], [10, 20, 30, 255], 0.5), [10, 20, 30, 128]);
}

#[test]
fn over_mixes_straight_colors_by_coverage() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 128];
    assert_eq!(over(dst, src, 1.0), [128, 0, 127, 255]);
}
