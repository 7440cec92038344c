// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Splits the rows of the image into contiguous bands, one per
//! worker.  Each worker computes its own band from nothing but its
//! index, and the root later relies on the very same arithmetic to
//! know how long every contribution ought to be; the gathered image
//! carries no row tags, so the two must never disagree.

use std::ops::Range;

use errors::RenderError;

/// A half-open range of image rows, `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band.
    pub start: usize,
    /// One past the last row of the band.
    pub end: usize,
}

impl RowBand {
    /// The number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the band has no rows.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The rows themselves, in order.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The band owned by worker `index` out of `workers`.  Every band but
/// the last is `height / workers` rows tall; the last one runs to the
/// bottom of the image and absorbs the remainder.
pub fn row_band(height: usize, workers: usize, index: usize) -> Result<RowBand, RenderError> {
    if workers == 0 {
        return Err(RenderError::Partition(
            "There must be at least one worker".to_string(),
        ));
    }
    if height == 0 {
        return Err(RenderError::Partition(
            "The image must be at least one row tall".to_string(),
        ));
    }
    if index >= workers {
        return Err(RenderError::Partition(format!(
            "Worker {} does not exist in a group of {}",
            index, workers
        )));
    }

    let chunk = height / workers;
    let start = index * chunk;
    let end = if index == workers - 1 {
        height
    } else {
        start + chunk
    };
    Ok(RowBand { start, end })
}

/// Every band, in worker order.  Fails the same way `row_band` does,
/// even when there are no workers to ask for a band.
pub fn row_bands(height: usize, workers: usize) -> Result<Vec<RowBand>, RenderError> {
    row_band(height, workers, 0)?;
    (0..workers)
        .map(|index| row_band(height, workers, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_partitions() {
        assert!(row_band(10, 0, 0).is_err());
        assert!(row_band(0, 3, 0).is_err());
        assert!(row_band(10, 3, 3).is_err());
        assert!(row_bands(10, 0).is_err());
    }

    #[test]
    fn no_workers_is_not_an_empty_partition() {
        match row_bands(10, 0) {
            Err(RenderError::Partition(_)) => {}
            other => panic!("expected a partition error, got {:?}", other),
        }
        match row_bands(0, 0) {
            Err(RenderError::Partition(_)) => {}
            other => panic!("expected a partition error, got {:?}", other),
        }
    }

    #[test]
    fn last_band_absorbs_remainder() {
        let bands = row_bands(10, 3).unwrap();
        assert_eq!(
            bands,
            vec![
                RowBand { start: 0, end: 3 },
                RowBand { start: 3, end: 6 },
                RowBand { start: 6, end: 10 },
            ]
        );
        assert_eq!(bands[2].len(), 4);
    }

    #[test]
    fn even_split() {
        let bands = row_bands(4, 2).unwrap();
        assert_eq!(bands[0].rows(), 0..2);
        assert_eq!(bands[1].rows(), 2..4);
    }

    #[test]
    fn more_workers_than_rows() {
        let bands = row_bands(3, 5).unwrap();
        assert!(bands[..4].iter().all(|b| b.is_empty()));
        assert_eq!(bands[4], RowBand { start: 0, end: 3 });
    }

    #[test]
    fn bands_tile_the_image() {
        for height in 1..60 {
            for workers in 1..12 {
                let bands = row_bands(height, workers).unwrap();
                let mut next = 0;
                for band in &bands {
                    assert_eq!(band.start, next);
                    next = band.end;
                }
                assert_eq!(next, height);

                let last = bands[workers - 1].len();
                for band in &bands[..workers - 1] {
                    assert_eq!(band.len(), height / workers);
                    assert!(last >= band.len());
                }
            }
        }
    }
}
