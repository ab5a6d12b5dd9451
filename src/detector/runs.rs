/// Run-length scanning of binarized rows and columns
use crate::models::BitMatrix;
use rayon::prelude::*;

/// Maximal stretch of same-coloured pixels along one scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// First pixel index on the line
    pub start: usize,
    /// One past the last pixel index
    pub end: usize,
    /// Colour of the run
    pub dark: bool,
}

impl Run {
    /// Number of pixels in the run
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; runs hold at least one pixel
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Midpoint of the run in continuous coordinates
    pub fn center(&self) -> f32 {
        (self.start + self.end) as f32 / 2.0
    }
}

/// Split one scan line into alternating runs.
/// The final run is closed at the end of the line, whatever its colour.
pub fn scan_line<I: IntoIterator<Item = bool>>(pixels: I) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut iter = pixels.into_iter();
    let Some(mut current) = iter.next() else {
        return runs;
    };
    let mut start = 0usize;
    let mut pos = 1usize;

    for dark in iter {
        if dark != current {
            runs.push(Run {
                start,
                end: pos,
                dark: current,
            });
            start = pos;
            current = dark;
        }
        pos += 1;
    }
    runs.push(Run {
        start,
        end: pos,
        dark: current,
    });
    runs
}

/// Runs for every row and every column of a binary image, in scan order
pub struct RunTable {
    rows: Vec<Vec<Run>>,
    cols: Vec<Vec<Run>>,
}

impl RunTable {
    /// Scan all rows (left to right) and columns (top to bottom)
    pub fn scan(binary: &BitMatrix) -> Self {
        let width = binary.width();
        let height = binary.height();

        let rows = (0..height)
            .into_par_iter()
            .map(|y| scan_line((0..width).map(|x| binary.get(x, y))))
            .collect();
        let cols = (0..width)
            .into_par_iter()
            .map(|x| scan_line((0..height).map(|y| binary.get(x, y))))
            .collect();

        Self { rows, cols }
    }

    /// Runs of row `y`
    pub fn row(&self, y: usize) -> &[Run] {
        self.rows.get(y).map_or(&[], Vec::as_slice)
    }

    /// Runs of column `x`
    pub fn column(&self, x: usize) -> &[Run] {
        self.cols.get(x).map_or(&[], Vec::as_slice)
    }

    /// Number of rows scanned
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns scanned
    pub fn width(&self) -> usize {
        self.cols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_line_alternates() {
        let line = [false, false, true, true, true, false, true];
        let runs = scan_line(line);
        assert_eq!(runs.len(), 4);
        assert_eq!(
            runs[1],
            Run {
                start: 2,
                end: 5,
                dark: true
            }
        );
        // Trailing dark run is closed at line end
        assert_eq!(
            runs[3],
            Run {
                start: 6,
                end: 7,
                dark: true
            }
        );
        assert!(runs.windows(2).all(|w| w[0].dark != w[1].dark));
    }

    #[test]
    fn test_scan_line_empty_and_uniform() {
        assert!(scan_line(std::iter::empty::<bool>()).is_empty());
        let runs = scan_line([true; 5]);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 5);
        assert_eq!(runs[0].center(), 2.5);
    }

    #[test]
    fn test_table_rows_and_columns() {
        let mut matrix = BitMatrix::new(4, 3);
        matrix.set(1, 0, true);
        matrix.set(1, 1, true);
        let table = RunTable::scan(&matrix);
        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 4);
        assert_eq!(table.row(0).len(), 3);
        assert_eq!(table.row(2).len(), 1);
        assert_eq!(
            table.column(1)[0],
            Run {
                start: 0,
                end: 2,
                dark: true
            }
        );
        assert!(table.row(7).is_empty());
    }
}
