extern crate clap;
extern crate env_logger;
extern crate mandelband;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelband::{Config, Raster, Region};
use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

/// Splits `s` at the first `separator` and parses both halves, as in
/// `800x600` or `-0.5,1.25`.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let mut halves = s.splitn(2, separator);
    let left = halves.next()?.parse().ok()?;
    let right = halves.next()?.parse().ok()?;
    Some((left, right))
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    parse_pair::<T>(s, separator)
        .map(|_| ())
        .ok_or_else(|| err.to_string())
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    range: (T, T),
    unparsable: &str,
    out_of_range: &str,
) -> Result<(), String> {
    match s.parse::<T>() {
        Err(_) => Err(unparsable.to_string()),
        Ok(ref n) if *n < range.0 || *n > range.1 => Err(out_of_range.to_string()),
        Ok(_) => Ok(()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";

fn args<'a>(default_workers: &'a str) -> ArgMatches<'a> {
    App::new("mandelband")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Banded Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(mandelband::config::DEFAULT_OUTPUT)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.0,2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value(default_workers)
                .validator(|s| {
                    validate_range(
                        &s,
                        (1, 4096),
                        "Could not parse worker count",
                        "Worker count must be between 1 and 4096",
                    )
                })
                .help("Number of workers sharing the image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2000")
                .validator(|s| {
                    validate_range(
                        &s,
                        (1, 200_000),
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iteration budget per point"),
        )
        .get_matches()
}

/// Turns validated arguments into a configuration.  Clap has already
/// run the validators, so parsing can only fail on a malformed
/// default.
fn build_config(matches: &ArgMatches) -> Result<Config, String> {
    let size = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or("Error parsing image dimensions")?;
    let leftlower = matches
        .value_of(LEFTLOWER)
        .and_then(parse_complex)
        .ok_or("Error parsing left lower point")?;
    let rightupper = matches
        .value_of(RIGHTUPPER)
        .and_then(parse_complex)
        .ok_or("Error parsing right upper point")?;
    let workers = matches
        .value_of(WORKERS)
        .and_then(|s| usize::from_str(s).ok())
        .ok_or("Could not parse worker count")?;
    let iterations = matches
        .value_of(ITERATIONS)
        .and_then(|s| u32::from_str(s).ok())
        .ok_or("Could not parse iteration count")?;
    let output = matches
        .value_of(OUTPUT)
        .map(PathBuf::from)
        .ok_or("No output file")?;

    Ok(Config {
        raster: Raster {
            width: size.0,
            height: size.1,
        },
        region: Region::from_corners(leftlower, rightupper),
        iterations,
        workers,
        output,
    })
}

fn main() {
    env_logger::init();
    let default_workers = num_cpus::get().to_string();
    let matches = args(&default_workers);

    let config = match build_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = mandelband::run(&config) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
