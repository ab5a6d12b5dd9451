/// Finder pattern detection using 1:1:3:1:1 run ratios on rows and columns
use crate::detector::runs::{Run, RunTable};
use crate::models::Point;

/// Detected finder-pattern hypothesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderCandidate {
    /// Pattern centre in image coordinates
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f32,
    /// Dark/light/dark/light/dark runs of the first row that matched
    pub runs: [Run; 5],
}

impl FinderCandidate {
    /// Full pattern width (7 modules)
    pub fn size(&self) -> f32 {
        self.module_size * 7.0
    }
}

/// One-dimensional hit on a single scan line
#[derive(Debug, Clone, Copy)]
struct LineHit {
    /// Position along the line (centre of the middle run)
    along: f32,
    /// Index of the scan line
    line: usize,
    module_size: f32,
    runs: [Run; 5],
}

pub struct FinderDetector;

impl FinderDetector {
    /// Candidates confirmed on both a row and a column, merged, in row-major
    /// order of first sighting
    pub fn detect(table: &RunTable) -> Vec<FinderCandidate> {
        let mut row_hits = Vec::new();
        for y in 0..table.height() {
            row_hits.extend(Self::scan_runs(table.row(y), y));
        }

        let mut col_hits: Vec<Vec<LineHit>> = Vec::with_capacity(table.width());
        for x in 0..table.width() {
            col_hits.push(Self::scan_runs(table.column(x), x));
        }

        let confirmed = Self::cross_check(&row_hits, &col_hits);
        let merged = Self::merge_candidates(confirmed);

        log::debug!(
            "finder: {} row hits, {} column hits, {} candidates",
            row_hits.len(),
            col_hits.iter().map(Vec::len).sum::<usize>(),
            merged.len()
        );
        merged
    }

    /// Every five-run window starting on a dark run that satisfies the ratio
    fn scan_runs(runs: &[Run], line: usize) -> Vec<LineHit> {
        runs.windows(5)
            .filter(|w| w[0].dark)
            .filter_map(|w| {
                let lengths = [w[0].len(), w[1].len(), w[2].len(), w[3].len(), w[4].len()];
                let module_size = Self::check_ratio(&lengths)?;
                Some(LineHit {
                    along: w[2].center(),
                    line,
                    module_size,
                    runs: [w[0], w[1], w[2], w[3], w[4]],
                })
            })
            .collect()
    }

    /// 1:1:3:1:1 test. Every run must be within half a module of its
    /// expected length. Returns the module size on success.
    fn check_ratio(lengths: &[usize; 5]) -> Option<f32> {
        let total: usize = lengths.iter().sum();
        if total < 7 {
            return None;
        }

        let unit = total as f32 / 7.0;
        let tolerance = unit / 2.0;
        let expected = [1.0, 1.0, 3.0, 1.0, 1.0];

        lengths
            .iter()
            .zip(expected)
            .all(|(&len, modules)| (len as f32 - modules * unit).abs() < tolerance)
            .then_some(unit)
    }

    /// Pair each row hit with the nearest column hit crossing it.
    /// The row fixes the centre's x, the column fixes its y.
    fn cross_check(row_hits: &[LineHit], col_hits: &[Vec<LineHit>]) -> Vec<FinderCandidate> {
        let mut confirmed = Vec::new();

        for h in row_hits {
            let reach = h.module_size;
            let lo = (h.along - 0.5 - reach).floor().max(0.0) as usize;
            let hi = ((h.along - 0.5 + reach).ceil().max(0.0) as usize).min(col_hits.len().saturating_sub(1));
            if col_hits.is_empty() || lo > hi {
                continue;
            }

            let row_center = h.line as f32 + 0.5;
            let best = (lo..=hi)
                .flat_map(|x| col_hits[x].iter())
                .filter(|v| {
                    let column_center = v.line as f32 + 0.5;
                    (column_center - h.along).abs() <= reach
                        && (v.along - row_center).abs() <= reach
                        && Self::similar_size(h.module_size, v.module_size)
                })
                .min_by(|a, b| {
                    let da = (a.line as f32 + 0.5 - h.along).abs();
                    let db = (b.line as f32 + 0.5 - h.along).abs();
                    da.total_cmp(&db)
                });

            if let Some(v) = best {
                confirmed.push(FinderCandidate {
                    center: Point::new(h.along, v.along),
                    module_size: (h.module_size + v.module_size) / 2.0,
                    runs: h.runs,
                });
            }
        }

        confirmed
    }

    fn similar_size(a: f32, b: f32) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        hi <= lo * 1.5
    }

    /// Average confirmations of the same pattern; keeps first-seen order
    fn merge_candidates(candidates: Vec<FinderCandidate>) -> Vec<FinderCandidate> {
        let mut merged: Vec<(FinderCandidate, f32)> = Vec::new();

        for candidate in candidates {
            let existing = merged.iter_mut().find(|(m, _)| {
                let limit = m.module_size.max(candidate.module_size).max(1.0) * 2.0;
                m.center.distance_squared(&candidate.center) < limit * limit
            });

            match existing {
                Some((m, count)) => {
                    let n = *count;
                    m.center = Point::new(
                        (m.center.x * n + candidate.center.x) / (n + 1.0),
                        (m.center.y * n + candidate.center.y) / (n + 1.0),
                    );
                    m.module_size = (m.module_size * n + candidate.module_size) / (n + 1.0);
                    *count += 1.0;
                }
                None => merged.push((candidate, 1.0)),
            }
        }

        merged.into_iter().map(|(c, _)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BitMatrix;

    /// Draw a 7x7-module finder pattern with its top-left at (x0, y0)
    fn draw_finder(matrix: &mut BitMatrix, x0: usize, y0: usize, unit: usize) {
        for my in 0..7 {
            for mx in 0..7 {
                let ring = mx == 0 || mx == 6 || my == 0 || my == 6;
                let core = (2..=4).contains(&mx) && (2..=4).contains(&my);
                if ring || core {
                    for dy in 0..unit {
                        for dx in 0..unit {
                            matrix.set(x0 + mx * unit + dx, y0 + my * unit + dy, true);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_check_ratio() {
        // Valid pattern: 3-3-9-3-3 (unit = 3)
        assert_eq!(FinderDetector::check_ratio(&[3, 3, 9, 3, 3]), Some(3.0));
        assert!(FinderDetector::check_ratio(&[1, 1, 3, 1, 1]).is_some());
        // Bad ratios - center not 3x
        assert!(FinderDetector::check_ratio(&[3, 3, 5, 3, 3]).is_none());
        assert!(FinderDetector::check_ratio(&[6, 2, 9, 3, 3]).is_none());
        assert!(FinderDetector::check_ratio(&[0, 0, 1, 0, 0]).is_none());
    }

    #[test]
    fn test_detects_single_pattern() {
        let mut matrix = BitMatrix::new(60, 60);
        draw_finder(&mut matrix, 10, 12, 4);

        let patterns = FinderDetector::detect(&RunTable::scan(&matrix));
        assert_eq!(patterns.len(), 1, "got {:?}", patterns);

        let p = &patterns[0];
        assert!((p.center.x - 24.0).abs() < 1.0, "x = {}", p.center.x);
        assert!((p.center.y - 26.0).abs() < 1.0, "y = {}", p.center.y);
        assert!((p.module_size - 4.0).abs() < 0.5);
        assert!((p.size() - 28.0).abs() < 3.5);
    }

    #[test]
    fn test_row_only_pattern_is_rejected() {
        // Black(3) - White(3) - Black(9) - White(3) - Black(3) on one row only
        let mut matrix = BitMatrix::new(25, 10);
        let y = 5;
        for x in (2..5).chain(8..17).chain(20..23) {
            matrix.set(x, y, true);
        }
        assert!(FinderDetector::detect(&RunTable::scan(&matrix)).is_empty());
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let mut matrix = BitMatrix::new(120, 120);
        draw_finder(&mut matrix, 70, 5, 3);
        draw_finder(&mut matrix, 5, 5, 3);
        draw_finder(&mut matrix, 5, 70, 3);

        let patterns = FinderDetector::detect(&RunTable::scan(&matrix));
        assert_eq!(patterns.len(), 3);
        // Same band of rows: leftmost first, then the lower pattern
        assert!(patterns[0].center.x < patterns[1].center.x);
        assert!(patterns[2].center.y > patterns[1].center.y);
    }
}
