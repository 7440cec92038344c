// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes the gathered image out as an 8-bit RGB PNG.  Each grey
//! level is copied into all three channels.

use std::convert::TryFrom;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::png::PNGEncoder;
use image::ColorType;
use itertools::repeat_n;

use errors::RenderError;
use planes::Raster;

/// Spreads a buffer of grey levels out to R, G and B.
pub fn grey_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels.iter().flat_map(|&p| repeat_n(p, 3)).collect()
}

/// Encodes `width * height` grey levels as an RGB PNG into `writer`.
pub fn encode<W: Write>(writer: W, pixels: &[u8], width: u32, height: u32) -> io::Result<()> {
    PNGEncoder::new(writer).encode(&grey_to_rgb(pixels), width, height, ColorType::RGB(8))
}

fn dimension(value: usize, name: &str) -> io::Result<u32> {
    u32::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("an image {} of {} does not fit in a PNG header", name, value),
        )
    })
}

/// Removes a half-written image.  Anything that is not a plain file,
/// a device for instance, is left where it is.
fn discard_partial(path: &Path) {
    match fs::metadata(path) {
        Ok(ref meta) if meta.is_file() => match fs::remove_file(path) {
            Ok(()) => warn!("discarded partial image {}", path.display()),
            Err(e) => warn!(
                "could not remove partial image {}: {}",
                path.display(),
                e
            ),
        },
        Ok(_) => warn!("{} is not a regular file, leaving it", path.display()),
        Err(e) => warn!("could not inspect partial image {}: {}", path.display(), e),
    }
}

/// Encodes `pixels` (row-major, `raster.width * raster.height` grey
/// levels) and writes them to `path`, replacing anything already
/// there.  If the encoder fails part way through, the half-written
/// file is removed.
pub fn write_image(path: &Path, pixels: &[u8], raster: Raster) -> Result<(), RenderError> {
    let fail = |error: io::Error| RenderError::Encoding {
        path: path.display().to_string(),
        error,
    };

    if pixels.len() != raster.len() {
        return Err(fail(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} pixels cannot fill a {}x{} image",
                pixels.len(),
                raster.width,
                raster.height
            ),
        )));
    }
    let width = dimension(raster.width, "width").map_err(fail)?;
    let height = dimension(raster.height, "height").map_err(fail)?;

    let mut output = BufWriter::new(File::create(path).map_err(fail)?);
    let encoded = encode(&mut output, pixels, width, height);
    if let Err(error) = encoded.and_then(|()| output.flush()) {
        drop(output);
        discard_partial(path);
        return Err(fail(error));
    }

    info!("wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}
