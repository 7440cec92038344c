// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The failure modes of a render.  None of them are recoverable: a
//! partial image is not a meaningful output, so every stage hands its
//! error straight back to the caller.

use std::io;

/// Everything that can stop a render.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A worker count, image height, or worker index that cannot be
    /// turned into row bands.
    #[fail(display = "Invalid partition: {}", _0)]
    Partition(String),

    /// A setting that no render can use, such as a zero iteration
    /// budget.
    #[fail(display = "Invalid configuration: {}", _0)]
    Config(String),

    /// The complex-plane window or the raster is malformed.
    #[fail(display = "Invalid region: {}", _0)]
    Region(String),

    /// A participant never contributed to the gather, or contributed
    /// a buffer of the wrong size.
    #[fail(display = "Collective failure: {}", _0)]
    CollectiveFailure(String),

    /// The output file could not be opened or the encoder gave up.
    #[fail(display = "Could not write {}: {}", path, error)]
    Encoding {
        /// The file we were trying to write.
        path: String,
        /// What went wrong underneath.
        #[fail(cause)]
        error: io::Error,
    },
}
