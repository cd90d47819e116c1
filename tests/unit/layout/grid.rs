use std::collections::HashSet;

use super::*;

fn px(width: u32, height: u32) -> PixelSize {
    PixelSize { width, height }
}

#[test]
fn row_major_eight_frames_four_columns() {
    let g = GridLayout::new(PackDirection::RowMajor, 4, 8, px(32, 32)).unwrap();
    assert_eq!(g.canvas_size(), px(128, 64));
    assert_eq!(g.columns(), 4);
    assert_eq!(g.rows(), 2);
    assert_eq!(g.cell_of(5), GridCell { col: 1, row: 1 });
    assert_eq!(g.origin_of(5), (32, 32));
}

#[test]
fn column_major_seven_frames_three_rows() {
    let g = GridLayout::new(PackDirection::ColumnMajor, 3, 7, px(16, 16)).unwrap();
    assert_eq!(g.canvas_size(), px(48, 48));
    assert_eq!(g.cell_of(4), GridCell { col: 1, row: 1 });
    assert_eq!(g.origin_of(4), (16, 16));
    assert_eq!(g.cell_of(6), GridCell { col: 2, row: 0 });
}

#[test]
fn fewer_frames_than_count_shrinks_the_packed_axis() {
    let g = GridLayout::new(PackDirection::RowMajor, 10, 3, px(8, 4)).unwrap();
    assert_eq!(g.canvas_size(), px(24, 4));

    let g = GridLayout::new(PackDirection::ColumnMajor, 10, 3, px(8, 4)).unwrap();
    assert_eq!(g.canvas_size(), px(8, 12));
}

#[test]
fn cells_are_unique_in_bounds_and_fit_the_canvas() {
    for direction in [PackDirection::RowMajor, PackDirection::ColumnMajor] {
        for n in 1..=24usize {
            for count in 1..=9u32 {
                let cell = px(3, 5);
                let g = GridLayout::new(direction, count, n, cell).unwrap();
                let canvas = g.canvas_size();
                assert!(canvas.area() >= n as u64 * cell.area());

                let mut seen = HashSet::new();
                for i in 0..n as u32 {
                    let c = g.cell_of(i);
                    match direction {
                        PackDirection::RowMajor => assert!(c.col < count),
                        PackDirection::ColumnMajor => assert!(c.row < count),
                    }
                    assert!(seen.insert(c), "{direction:?} n={n} count={count} i={i}");

                    let (x, y) = g.origin_of(i);
                    assert!(x + cell.width <= canvas.width);
                    assert!(y + cell.height <= canvas.height);
                }
            }
        }
    }
}

#[test]
fn degenerate_inputs_are_rejected() {
    assert!(matches!(
        GridLayout::new(PackDirection::RowMajor, 0, 4, px(1, 1)),
        Err(SheetError::Validation(_))
    ));
    assert!(matches!(
        GridLayout::new(PackDirection::RowMajor, 4, 0, px(1, 1)),
        Err(SheetError::EmptySelection(_))
    ));
    assert!(GridLayout::new(PackDirection::ColumnMajor, 1, 1, px(0, 1)).is_err());
}

#[test]
fn oversized_sheets_are_rejected() {
    assert!(matches!(
        GridLayout::new(PackDirection::RowMajor, 3, 3, px(u32::MAX / 2, 1)),
        Err(SheetError::Validation(_))
    ));
}

#[test]
fn direction_parses_aliases() {
    let d: PackDirection = serde_json::from_str("\"horizontal\"").unwrap();
    assert_eq!(d, PackDirection::RowMajor);
    let d: PackDirection = serde_json::from_str("\"column_major\"").unwrap();
    assert_eq!(d, PackDirection::ColumnMajor);
    let d: PackDirection = serde_json::from_str("\"vertical\"").unwrap();
    assert_eq!(d, PackDirection::ColumnMajor);
}
