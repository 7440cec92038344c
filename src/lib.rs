#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Banded Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which iterating z = z² + c from zero never runs off to infinity.
//! Points outside the set escape, some quickly and some only after a
//! long while, and the number of iterations it takes them is what
//! this crate paints: black for the set itself, brighter grey the
//! longer a point held out.
//!
//! The image is cut into horizontal bands of rows, one per worker.
//! Workers render their bands independently, then meet at a single
//! gather where worker 0 collects every band, in worker order, into
//! the finished image and writes it out as a PNG.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
extern crate tempfile;

pub mod bands;
pub mod collective;
pub mod config;
pub mod encoder;
pub mod errors;
pub mod escape;
pub mod planes;
pub mod render;
pub mod worker;

pub use bands::{row_band, row_bands, RowBand};
pub use collective::{Communicator, Group};
pub use config::Config;
pub use encoder::write_image;
pub use errors::RenderError;
pub use escape::{escape_time, intensity, pixel_value};
pub use planes::{Pixel, PlaneMapper, Raster, Region};
pub use render::{render, run};
pub use worker::{compute_band, render_sequential};
