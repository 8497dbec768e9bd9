use std::path::Path;

use shellres::{Config, Error};
use tempfile::TempDir;

mod common;
use common::trajectories;

fn config_in(dir: &TempDir, input: impl AsRef<Path>) -> Config {
    Config {
        input: input.as_ref().to_path_buf(),
        output: dir.path().join("bins.txt"),
        log: dir.path().join("log.txt"),
        ..Config::default()
    }
}

#[test]
fn chloride() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir, trajectories::CHLORIDE);
    let summary = shellres::run(&config)?;

    assert_eq!(summary.nframes, 5);
    assert_eq!(summary.nresidences, 3);
    assert_eq!(summary.binned, 3);
    assert_eq!(summary.overflow, 0);
    assert_eq!(
        summary.to_string(),
        "Average Oxygens in First Shell = 1.800000e+00\n\
         Average residence time = 4.666667e-12\n"
    );

    let bins = std::fs::read_to_string(&config.output)?;
    assert_eq!(
        bins,
        "0.000000e+00, 3.000000e-12, 6.000000e-12, 2\n\
         6.000000e-12, 9.000000e-12, 1.200000e-11, 1\n\
         1.200000e-11, 1.500000e-11, 1.800000e-11, 0\n\
         1.800000e-11, 2.100000e-11, 2.400000e-11, 0\n\
         2.400000e-11, 2.700000e-11, 3.000000e-11, 0\n"
    );

    let log = std::fs::read_to_string(&config.log)?;
    assert_eq!(
        log,
        "Frame number 1:\n\
         Current Atoms:\n\
         2, 8, \n\
         Atoms Entering\n\
         2, 8, \n\
         Frame number 2:\n\
         Current Atoms:\n\
         2, 5, \n\
         Atoms Leaving\n\
         8, \n\
         Atoms Entering\n\
         5, \n\
         Residence #0: t = 2.000000e-12(1-2)\n\
         Frame number 4:\n\
         Current Atoms:\n\
         2, 8, \n\
         Atoms Leaving\n\
         5, \n\
         Atoms Entering\n\
         8, \n\
         Residence #1: t = 4.000000e-12(2-4)\n\
         Frame number 5:\n\
         Current Atoms:\n\
         8, \n\
         Atoms Leaving\n\
         2, \n\
         Residence #2: t = 8.000000e-12(1-5)\n"
    );
    Ok(())
}

#[test]
fn rerun_is_identical() -> Result<(), Box<dyn std::error::Error>> {
    let first = tempfile::tempdir()?;
    let second = tempfile::tempdir()?;
    let a = config_in(&first, trajectories::CHLORIDE);
    let b = config_in(&second, trajectories::CHLORIDE);
    assert_eq!(shellres::run(&a)?, shellres::run(&b)?);
    assert_eq!(std::fs::read(&a.output)?, std::fs::read(&b.output)?);
    assert_eq!(std::fs::read(&a.log)?, std::fs::read(&b.log)?);
    Ok(())
}

#[test]
fn missing_input_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = config_in(&dir, dir.path().join("missing.arc"));
    let err = shellres::run(&config).unwrap_err();
    assert!(matches!(&err, Error::Open { path, .. } if path == &config.input));
    assert!(err.to_string().contains("missing.arc"));
    // The histogram is only ever written after a complete pass.
    assert!(!config.output.exists());
    Ok(())
}

#[test]
fn uncreatable_log_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut config = config_in(&dir, trajectories::CHLORIDE);
    config.log = dir.path().join("no").join("such").join("log.txt");
    let err = shellres::run(&config).unwrap_err();
    assert!(matches!(&err, Error::Create { path, .. } if path == &config.log));
    assert!(!config.output.exists());
    Ok(())
}

#[test]
fn uncreatable_output_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut config = config_in(&dir, trajectories::CHLORIDE);
    config.output = dir.path().join("no").join("bins.txt");
    let err = shellres::run(&config).unwrap_err();
    assert!(matches!(&err, Error::Create { path, .. } if path == &config.output));
    Ok(())
}

#[test]
fn invalid_config_touches_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = Config {
        bin_width: 0.0,
        ..config_in(&dir, trajectories::CHLORIDE)
    };
    assert!(matches!(
        shellres::run(&config),
        Err(Error::InvalidConfig(_))
    ));
    assert!(!config.log.exists());
    assert!(!config.output.exists());
    Ok(())
}

#[test]
fn config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shellres.toml");
    std::fs::write(
        &path,
        format!(
            "input = {:?}\noutput = {:?}\nlog = {:?}\nbins = 2\nflush_open_on_eof = true\n",
            trajectories::CHLORIDE,
            dir.path().join("bins.txt"),
            dir.path().join("log.txt"),
        ),
    )?;
    let config = Config::load(&path)?;
    let summary = shellres::run(&config)?;
    // Atom 8 is still inside after frame 5 and gets closed at that frame.
    assert_eq!(summary.nresidences, 4);
    assert_eq!(
        std::fs::read_to_string(&config.output)?.lines().count(),
        2
    );
    assert!(std::fs::read_to_string(&config.log)?
        .ends_with("Residence #3: t = 2.000000e-12(4-5)\n"));
    Ok(())
}
