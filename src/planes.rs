// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between the pixel grid of the output image, with an origin at 0,0,
//! and a rectangular window on the complex plane.  Every worker builds
//! the same mapper from the same configuration, so every worker agrees
//! on which point a given pixel stands for.
use num::Complex;

use errors::RenderError;

/// Describes the width and height of the raster in pixels.  The grid
/// is assumed to start at 0,0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Raster {
    /// Pixels per row.
    pub width: usize,
    /// Rows in the image.
    pub height: usize,
}

impl Raster {
    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True if the raster has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The window on the complex plane, treating the real part as the
/// x-axis and the imaginary part as the y-axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Real component at column 0.
    pub x_min: f64,
    /// Real component the last column approaches.
    pub x_max: f64,
    /// Imaginary component at row 0.
    pub y_min: f64,
    /// Imaginary component the last row approaches.
    pub y_max: f64,
}

impl Region {
    /// Build a region from its lower-left and upper-right corners.
    pub fn from_corners(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Region {
        Region {
            x_min: leftlower.re,
            x_max: rightupper.re,
            y_min: leftlower.im,
            y_max: rightupper.im,
        }
    }
}

/// Describes the column, row of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a raster onto points of a complex-plane region.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The pixel grid.
    pub raster: Raster,
    /// The complex-plane window the grid is laid over.
    pub region: Region,
}

impl PlaneMapper {
    /// Constructor.  Rejects regions whose corners are the wrong way
    /// round and rasters with no columns.  A raster with no rows is
    /// left for the partitioner to reject.
    pub fn new(raster: Raster, region: Region) -> Result<PlaneMapper, RenderError> {
        if region.x_max < region.x_min {
            return Err(RenderError::Region(
                "x_max is to the left of x_min".to_string(),
            ));
        }

        if region.y_max < region.y_min {
            return Err(RenderError::Region("y_max is below y_min".to_string()));
        }

        if raster.width == 0 {
            return Err(RenderError::Region(
                "The image must be at least one pixel wide".to_string(),
            ));
        }

        Ok(PlaneMapper { raster, region })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.raster.len()
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.raster.is_empty()
    }

    /// Given a pixel, return the point on the complex plane it stands
    /// for.  The arithmetic is fixed as `min + index * extent / size`
    /// so that every participant derives bit-identical coordinates.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let r = &self.region;
        Complex::new(
            r.x_min + ((pixel.0 as f64) * (r.x_max - r.x_min)) / (self.raster.width as f64),
            r.y_min + ((pixel.1 as f64) * (r.y_max - r.y_min)) / (self.raster.height as f64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: usize) -> PlaneMapper {
        PlaneMapper::new(
            Raster {
                width: size,
                height: size,
            },
            Region {
                x_min: -2.0,
                x_max: 2.0,
                y_min: -2.0,
                y_max: 2.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn planemapper_fails_on_bad_shape() {
        let pm = PlaneMapper::new(
            Raster {
                width: 4,
                height: 4,
            },
            Region::from_corners(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0)),
        );
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_zero_width() {
        let pm = PlaneMapper::new(
            Raster {
                width: 0,
                height: 4,
            },
            Region::from_corners(Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0)),
        );
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = square(4);
        assert_eq!(pm.len(), 16);
        assert!(!pm.is_empty());
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = square(4);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(1, 3)), Complex::new(-1.0, 1.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
    }

    #[test]
    fn last_pixel_stops_short_of_the_far_edge() {
        let pm = square(800);
        let p = pm.pixel_to_point(&Pixel(799, 799));
        assert!(p.re < 2.0 && p.im < 2.0);
        assert_eq!(pm.pixel_to_point(&Pixel(400, 400)), Complex::new(0.0, 0.0));
    }
}
