use super::*;
use crate::document::info::DocumentInfo;
use crate::document::layered::{Cel, Layer, LayeredDocument};
use crate::foundation::core::{PixelRect, PixelSize};
use crate::foundation::error::SheetError;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn cel(x: i64, y: i64, rgba: [u8; 4]) -> Cel {
    Cel::filled(
        x,
        y,
        PixelSize {
            width: 2,
            height: 2,
        },
        rgba,
    )
    .unwrap()
}

fn doc(end: u64, layers: Vec<Layer>) -> LayeredDocument {
    LayeredDocument::new(
        DocumentInfo::new(16, 16, FrameIndex(0), FrameIndex(end)),
        layers,
    )
    .unwrap()
}

fn span(start: u64, end: u64, step: u64) -> FrameSpan {
    FrameSpan::new(FrameIndex(start), FrameIndex(end), step).unwrap()
}

fn frames(selected: &[SelectedFrame]) -> Vec<u64> {
    selected.iter().map(|s| s.frame.0).collect()
}

#[test]
fn no_filters_returns_every_stepped_index() {
    let mut d = doc(20, vec![]);
    let got = FrameSelector::select(&mut d, &FrameSelectionCriteria::all(span(3, 17, 4))).unwrap();
    assert_eq!(frames(&got), vec![3, 7, 11, 15]);
    for (i, s) in got.iter().enumerate() {
        assert_eq!(s.ordinal, i);
    }
}

#[test]
fn skip_blank_drops_transparent_frames() {
    let layer = Layer::paint("p")
        .with_keyframe(FrameIndex(2), cel(0, 0, RED))
        .with_keyframe(FrameIndex(4), Cel::filled(0, 0, PixelSize { width: 0, height: 0 }, RED).unwrap())
        .with_keyframe(FrameIndex(6), cel(3, 3, RED));
    let mut d = doc(7, vec![layer]);
    let criteria = FrameSelectionCriteria {
        skip_blank: true,
        ..FrameSelectionCriteria::all(span(0, 7, 1))
    };
    let got = FrameSelector::select(&mut d, &criteria).unwrap();
    assert_eq!(frames(&got), vec![2, 3, 6, 7]);
    assert_eq!(got[2].ordinal, 2);
}

#[test]
fn only_keyframes_ignores_hidden_layers() {
    let shown = Layer::paint("shown")
        .with_keyframe(FrameIndex(0), cel(0, 0, RED))
        .with_keyframe(FrameIndex(4), cel(1, 1, RED));
    let hidden = Layer::paint("hidden")
        .with_keyframe(FrameIndex(2), cel(0, 0, BLUE))
        .with_visible(false);
    let nested = Layer::group(
        "g",
        vec![Layer::paint("inner").with_keyframe(FrameIndex(5), cel(5, 5, BLUE))],
    );
    let mut d = doc(6, vec![shown, hidden, nested]);
    let criteria = FrameSelectionCriteria {
        only_keyframes: true,
        ..FrameSelectionCriteria::all(span(0, 6, 1))
    };
    let got = FrameSelector::select(&mut d, &criteria).unwrap();
    assert_eq!(frames(&got), vec![0, 4, 5]);
}

#[test]
fn skip_duplicate_keeps_first_occurrence() {
    let layer = Layer::paint("p")
        .with_keyframe(FrameIndex(0), cel(0, 0, RED))
        .with_keyframe(FrameIndex(2), cel(4, 4, BLUE))
        .with_keyframe(FrameIndex(3), cel(8, 8, RED))
        .with_keyframe(FrameIndex(5), cel(4, 4, BLUE));
    let mut d = doc(5, vec![layer]);
    let criteria = FrameSelectionCriteria {
        skip_duplicate: true,
        ..FrameSelectionCriteria::all(span(2, 5, 1))
    };
    let got = FrameSelector::select(&mut d, &criteria).unwrap();
    // 5 repeats 2; 4 holds 3.
    assert_eq!(frames(&got), vec![2, 3]);
    assert_eq!(got[1].ordinal, 1);
}

#[test]
fn skip_duplicate_matches_a_moved_sprite() {
    let layer = Layer::paint("p")
        .with_keyframe(FrameIndex(0), cel(0, 0, RED))
        .with_keyframe(FrameIndex(1), cel(6, 3, RED));
    let mut d = doc(1, vec![layer]);
    let criteria = FrameSelectionCriteria {
        skip_duplicate: true,
        ..FrameSelectionCriteria::all(span(0, 1, 1))
    };
    let got = FrameSelector::select(&mut d, &criteria).unwrap();
    assert_eq!(frames(&got), vec![0]);
}

#[test]
fn skip_duplicate_compares_against_retained_frames_only() {
    // Frame 1 is blank and never reaches the duplicate index; 3 repeats 2 and 4 repeats 0.
    let layer = Layer::paint("p")
        .with_keyframe(FrameIndex(0), cel(0, 0, RED))
        .with_keyframe(FrameIndex(1), Cel::filled(0, 0, PixelSize { width: 0, height: 0 }, RED).unwrap())
        .with_keyframe(FrameIndex(2), cel(2, 2, BLUE))
        .with_keyframe(FrameIndex(4), cel(5, 5, RED));
    let mut d = doc(4, vec![layer]);
    let criteria = FrameSelectionCriteria {
        skip_blank: true,
        skip_duplicate: true,
        ..FrameSelectionCriteria::all(span(0, 4, 1))
    };
    let got = FrameSelector::select(&mut d, &criteria).unwrap();
    assert_eq!(frames(&got), vec![0, 2]);
}

#[test]
fn selection_is_idempotent() {
    let layer = Layer::paint("p")
        .with_keyframe(FrameIndex(1), cel(0, 0, RED))
        .with_keyframe(FrameIndex(3), cel(0, 0, RED))
        .with_keyframe(FrameIndex(6), cel(6, 0, BLUE));
    let mut d = doc(8, vec![layer]);
    let criteria = FrameSelectionCriteria {
        skip_blank: true,
        only_keyframes: true,
        skip_duplicate: true,
        span: span(0, 8, 1),
    };
    let a = FrameSelector::select(&mut d, &criteria).unwrap();
    let b = FrameSelector::select(&mut d, &criteria).unwrap();
    assert_eq!(a, b);
    assert_eq!(frames(&a), vec![1, 6]);
}

#[test]
fn everything_filtered_is_an_empty_result() {
    let mut d = doc(3, vec![]);
    let criteria = FrameSelectionCriteria {
        skip_blank: true,
        ..FrameSelectionCriteria::all(span(0, 3, 1))
    };
    assert!(FrameSelector::select(&mut d, &criteria).unwrap().is_empty());
}

struct BrokenSource {
    inner: LayeredDocument,
}

impl AnimationSource for BrokenSource {
    type Node = Layer;

    fn info(&self) -> &DocumentInfo {
        self.inner.info()
    }

    fn current_time(&self) -> FrameIndex {
        self.inner.current_time()
    }

    fn request_time(&mut self, frame: FrameIndex) -> SheetResult<()> {
        self.inner.request_time(frame)
    }

    fn wait_for_done(&mut self) -> SheetResult<()> {
        Err(SheetError::source_unavailable("renderer went away"))
    }

    fn tight_bounds(&self) -> SheetResult<PixelRect> {
        self.inner.tight_bounds()
    }

    fn read_pixels(&self, rect: PixelRect) -> SheetResult<Vec<u8>> {
        self.inner.read_pixels(rect)
    }

    fn root_node(&self) -> &Layer {
        self.inner.root_node()
    }
}

#[test]
fn render_failures_abort_selection() {
    let mut src = BrokenSource { inner: doc(3, vec![]) };
    let criteria = FrameSelectionCriteria {
        skip_blank: true,
        ..FrameSelectionCriteria::all(span(0, 3, 1))
    };
    assert!(matches!(
        FrameSelector::select(&mut src, &criteria),
        Err(SheetError::SourceUnavailable(_))
    ));
}
