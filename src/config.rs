// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render configuration.  Built once at startup and handed to
//! every worker by reference; nothing in it changes during a run.

use std::path::PathBuf;

use bands::row_band;
use errors::RenderError;
use planes::{PlaneMapper, Raster, Region};

/// Default image size, in pixels, along each axis.
pub const DEFAULT_SIZE: usize = 800;
/// Default iteration budget.
pub const DEFAULT_ITERATIONS: u32 = 2000;
/// Default output file.
pub const DEFAULT_OUTPUT: &str = "maramiro.png";

/// Everything a worker needs to know about the run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Size of the output image.
    pub raster: Raster,
    /// Window on the complex plane.
    pub region: Region,
    /// Iteration budget for the escape-time kernel.
    pub iterations: u32,
    /// Number of workers in the group.  Worker 0 gathers and encodes.
    pub workers: usize,
    /// Where the image is written.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            raster: Raster {
                width: DEFAULT_SIZE,
                height: DEFAULT_SIZE,
            },
            region: Region {
                x_min: -2.0,
                x_max: 2.0,
                y_min: -2.0,
                y_max: 2.0,
            },
            iterations: DEFAULT_ITERATIONS,
            workers: num_cpus::get(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Checks the configuration before any work starts, and returns
    /// the plane mapper every worker will share.
    pub fn validate(&self) -> Result<PlaneMapper, RenderError> {
        if self.iterations == 0 {
            return Err(RenderError::Config(
                "The iteration budget must be positive".to_string(),
            ));
        }
        // Worker 0 always exists, so this checks the count and the height.
        row_band(self.raster.height, self.workers, 0)?;
        PlaneMapper::new(self.raster, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.workers >= 1);
        let plane = config.validate().unwrap();
        assert_eq!(plane.len(), 640_000);
    }

    #[test]
    fn rejects_no_workers() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(RenderError::Partition(_)) => {}
            other => panic!("expected a partition error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_image() {
        let config = Config {
            raster: Raster {
                width: 10,
                height: 0,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_budget() {
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
