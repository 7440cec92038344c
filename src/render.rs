// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drives a whole run.  Every worker gets its index, works out its own
//! band, renders it, and meets the others at the gather.  Worker 0 is
//! the root: it receives the finished image and is the only one that
//! writes a file.

use crossbeam::thread::ScopedJoinHandle;

use bands::{row_band, row_bands};
use collective::{Communicator, Group};
use config::Config;
use encoder::write_image;
use errors::RenderError;
use planes::PlaneMapper;
use worker::compute_band;

/// The rank that gathers and encodes.
pub const ROOT: usize = 0;

type WorkerResult = Result<Option<Vec<u8>>, RenderError>;

/// One worker's whole life: compute its band, then take part in the
/// gather.  Only the root comes back with pixels.
fn worker(comm: Communicator, plane: &PlaneMapper, budget: u32) -> WorkerResult {
    let band = row_band(plane.raster.height, comm.size(), comm.rank())?;
    debug!(
        "worker {} computing rows {}..{}",
        comm.rank(),
        band.start,
        band.end
    );
    let local = compute_band(plane, budget, band);
    comm.gather(local)
}

/// Renders the image with `config.workers` workers and returns the
/// gathered buffer, in row order.
pub fn render(config: &Config) -> Result<Vec<u8>, RenderError> {
    render_with(config, worker)
}

/// Runs `work` once per rank on its own thread and returns the root's
/// buffer.  A worker that panics or leaves without gathering fails the
/// whole render.
fn render_with<F>(config: &Config, work: F) -> Result<Vec<u8>, RenderError>
where
    F: Fn(Communicator, &PlaneMapper, u32) -> WorkerResult + Sync,
{
    let plane = config.validate()?;
    let expected: Vec<usize> = row_bands(plane.raster.height, config.workers)?
        .iter()
        .map(|band| band.len() * plane.raster.width)
        .collect();
    let group = Group::new(ROOT, expected)?;
    info!(
        "rendering {}x{} with {} workers, {} iterations",
        plane.raster.width, plane.raster.height, config.workers, config.iterations
    );

    let budget = config.iterations;
    let plane = &plane;
    let work = &work;
    let mut results: Vec<WorkerResult> = vec![];
    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<WorkerResult>> = group
            .into_iter()
            .map(|comm| spawner.spawn(move |_| work(comm, plane, budget)))
            .collect();

        results = handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(RenderError::CollectiveFailure(format!(
                        "worker {} panicked",
                        rank
                    )))
                })
            })
            .collect();
    })
    .map_err(|_| RenderError::CollectiveFailure("a worker panicked".to_string()))?;

    let mut image = None;
    for result in results {
        if let Some(pixels) = result? {
            image = Some(pixels);
        }
    }
    image.ok_or_else(|| RenderError::CollectiveFailure("the root produced no image".to_string()))
}

/// Renders the image and writes it to `config.output`.
pub fn run(config: &Config) -> Result<(), RenderError> {
    let pixels = render(config)?;
    write_image(&config.output, &pixels, config.raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planes::{Raster, Region};
    use worker::render_sequential;

    fn small(width: usize, height: usize, workers: usize) -> Config {
        Config {
            raster: Raster { width, height },
            region: Region {
                x_min: -2.0,
                x_max: 2.0,
                y_min: -2.0,
                y_max: 2.0,
            },
            iterations: 10,
            workers,
            ..Config::default()
        }
    }

    #[test]
    fn four_by_four_on_two_workers() {
        let config = small(4, 4, 2);
        let image = render(&config).unwrap();
        assert_eq!(image.len(), 16);
        assert_eq!(image, render_sequential(&config).unwrap());
    }

    #[test]
    fn uneven_bands_match_sequential() {
        let config = Config {
            iterations: 50,
            ..small(31, 10, 3)
        };
        let reference = render_sequential(&config).unwrap();
        assert_eq!(render(&config).unwrap(), reference);
    }

    #[test]
    fn worker_count_never_changes_the_image() {
        let reference = render_sequential(&small(16, 13, 1)).unwrap();
        for workers in 1..17 {
            assert_eq!(render(&small(16, 13, workers)).unwrap(), reference);
        }
    }

    #[test]
    fn invalid_partition_fails_before_compute() {
        match render(&small(4, 4, 0)) {
            Err(RenderError::Partition(_)) => {}
            other => panic!("expected a partition error, got {:?}", other),
        }
        assert!(render(&small(4, 0, 2)).is_err());
    }

    fn expect_collective_failure(result: Result<Vec<u8>, RenderError>) {
        match result {
            Err(RenderError::CollectiveFailure(_)) => {}
            other => panic!("expected a collective failure, got {:?}", other),
        }
    }

    #[test]
    fn panicking_worker_fails_the_render() {
        let result = render_with(&small(8, 8, 3), |comm, plane, budget| {
            if comm.rank() == 1 {
                panic!("worker 1 gives up");
            }
            worker(comm, plane, budget)
        });
        expect_collective_failure(result);
    }

    #[test]
    fn worker_that_skips_the_gather_fails_the_render() {
        let result = render_with(&small(8, 8, 4), |comm, plane, budget| {
            if comm.rank() == 3 {
                drop(comm);
                return Ok(None);
            }
            worker(comm, plane, budget)
        });
        expect_collective_failure(result);
    }

    #[test]
    fn run_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output: dir.path().join("band.png"),
            ..small(8, 6, 4)
        };
        run(&config).unwrap();
        assert!(config.output.exists());
    }
}
