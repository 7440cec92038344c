// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The compute stage: turn one band of rows into grey levels.  This
//! never talks to any other worker.

use itertools::iproduct;

use bands::RowBand;
use config::Config;
use errors::RenderError;
use escape::pixel_value;
use planes::{Pixel, PlaneMapper};

/// Renders every pixel of `band`, row by row, left to right.  The
/// buffer holds `width * band.len()` values and starts at the band's
/// first row; an empty band gives an empty buffer.
pub fn compute_band(plane: &PlaneMapper, budget: u32, band: RowBand) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(plane.raster.width * band.len());
    for (row, column) in iproduct!(band.rows(), 0..plane.raster.width) {
        let c = plane.pixel_to_point(&Pixel(column, row));
        buffer.push(pixel_value(c, budget));
    }
    buffer
}

/// The main function for single-threaded renders: the whole image as
/// one band.  Used as the reference the banded render has to match.
pub fn render_sequential(config: &Config) -> Result<Vec<u8>, RenderError> {
    let plane = config.validate()?;
    let band = RowBand {
        start: 0,
        end: plane.raster.height,
    };
    Ok(compute_band(&plane, config.iterations, band))
}
