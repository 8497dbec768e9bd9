//! Residence times of water oxygens in the first shell around a reference atom.
//!
//! A text trajectory is read one frame at a time. Each frame yields the oxygens that lie within
//! the shell radius of the structure center. Comparing the shell of consecutive frames gives the
//! moments atoms enter and leave, and each completed stay becomes a [`Residence`]. Once the
//! trajectory is exhausted, the residence times are counted into a fixed-width [`Histogram`].
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use log::info;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::histogram::{mean_residence_time, Bin, Histogram};
use crate::output::{sci, write_histogram, FrameLog};
pub use crate::reader::{ArcReader, Shell};
pub use crate::tracker::{Residence, ResidenceTracker, Transition};

pub mod config;
pub mod error;
pub mod histogram;
pub mod output;
pub mod reader;
pub mod tracker;

/// Atom identifiers are assumed to refer to the same atom in every frame.
pub type AtomId = i64;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Atom {
    pub id: AtomId,
    pub element: String,
    pub position: DVec3,
    /// Force field type label. Kept as is.
    pub kind: String,
}

#[derive(Debug, Default, Clone)]
pub struct Frame {
    /// One-based index. Frame `n` is closed by the `n`th separator line.
    pub index: usize,
    /// The structure center as it stood when the frame was closed.
    pub center: DVec3,
    /// All atoms of this frame by id.
    pub atoms: HashMap<AtomId, Atom>,
    /// Ids of the oxygens inside the shell, in the order they were read.
    pub shell: Vec<AtomId>,
}

/// The outcome of a single pass over a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub nframes: usize,
    /// Sum of the shell sizes over all frames.
    pub shell_total: usize,
    /// Completed residences, in the order they were closed.
    pub residences: Vec<Residence>,
    /// Residences still open at the end of the trajectory.
    pub open: usize,
    /// How many of the open residences were closed at the end and appended to `residences`.
    pub flushed: usize,
}

impl Analysis {
    /// The mean number of shell oxygens per frame.
    pub fn mean_shell_size(&self) -> Option<f64> {
        if self.nframes == 0 {
            return None;
        }
        Some(self.shell_total as f64 / self.nframes as f64)
    }

    pub fn mean_residence_time(&self) -> Option<f64> {
        mean_residence_time(&self.residences)
    }

    /// Bin the residence times. Without an explicit bin count there is one bin per frame.
    pub fn histogram(&self, config: &Config) -> Histogram {
        let nbins = config.bins.unwrap_or(self.nframes);
        let mut histogram = Histogram::new(nbins, config.bin_width);
        histogram.extend_residences(&self.residences);
        histogram
    }
}

/// Run the tracker over every frame of `reader`, logging changes to `log` as they happen.
pub fn analyze<R: BufRead, W: Write>(
    reader: &mut ArcReader<R>,
    log: &mut FrameLog<W>,
    config: &Config,
) -> Result<Analysis> {
    let read_error = |source| Error::Read {
        path: config.input.clone(),
        source,
    };
    let write_error = |source| Error::Write {
        path: config.log.clone(),
        source,
    };

    let mut tracker = ResidenceTracker::new(config.frame_time);
    let mut frame = Frame::default();
    let mut previous = Vec::new();
    let mut shell_total = 0;

    loop {
        match reader.read_frame(&mut frame) {
            Ok(()) => {}
            // We have found the end of the trajectory.
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(read_error(err)),
        }

        let transition = tracker.update(&previous, &frame.shell, frame.index);
        log.write_transition(frame.index, &frame.shell, &transition)
            .map_err(write_error)?;
        for idx in transition.closed {
            log.write_residence(idx, &tracker.completed()[idx])
                .map_err(write_error)?;
        }

        shell_total += frame.shell.len();
        // The current shell becomes the previous one. The old previous buffer is reused.
        std::mem::swap(&mut previous, &mut frame.shell);
    }

    let nframes = reader.nframes();
    let open = tracker.open().count();
    let mut flushed = 0;
    if config.flush_open_on_eof {
        let closed = tracker.flush(nframes);
        flushed = closed.len();
        for idx in closed {
            log.write_residence(idx, &tracker.completed()[idx])
                .map_err(write_error)?;
        }
    } else if open > 0 {
        info!("dropping {open} residences that are still open after frame {nframes}");
    }

    Ok(Analysis {
        nframes,
        shell_total,
        residences: tracker.into_completed(),
        open,
        flushed,
    })
}

/// Figures reported at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub nframes: usize,
    pub mean_shell_size: Option<f64>,
    pub nresidences: usize,
    pub mean_residence_time: Option<f64>,
    /// Residences counted into the histogram.
    pub binned: usize,
    /// Residences too long for the histogram.
    pub overflow: usize,
}

impl Summary {
    pub fn new(analysis: &Analysis, histogram: &Histogram) -> Self {
        Self {
            nframes: analysis.nframes,
            mean_shell_size: analysis.mean_shell_size(),
            nresidences: analysis.residences.len(),
            mean_residence_time: analysis.mean_residence_time(),
            binned: histogram.total(),
            overflow: histogram.dropped(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mean_shell_size = self.mean_shell_size.unwrap_or(f64::NAN);
        writeln!(f, "Average Oxygens in First Shell = {}", sci(mean_shell_size))?;
        match self.mean_residence_time {
            Some(mean) => writeln!(f, "Average residence time = {}", sci(mean)),
            None => writeln!(f, "No completed residences found"),
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Analyze the trajectory at `config.input`, writing the change log to `config.log` and the
/// histogram to `config.output`.
///
/// Nothing is written to the histogram file until the whole trajectory has been read.
pub fn run(config: &Config) -> Result<Summary> {
    config.validate()?;

    let mut log = FrameLog::new(create(&config.log)?);
    let mut reader =
        ArcReader::open(&config.input, Shell::from(config)).map_err(|source| Error::Open {
            path: config.input.clone(),
            source,
        })?;
    info!("reading trajectory from {}", config.input.display());

    let analysis = analyze(&mut reader, &mut log, config)?;
    log.flush().map_err(|source| Error::Write {
        path: config.log.clone(),
        source,
    })?;
    info!(
        "read {} frames, {} completed residences ({} flushed), {} left open",
        analysis.nframes,
        analysis.residences.len(),
        analysis.flushed,
        analysis.open - analysis.flushed,
    );

    let histogram = analysis.histogram(config);
    if histogram.dropped() > 0 {
        info!(
            "{} residences exceed the last bin at {} and are not counted",
            histogram.dropped(),
            sci(histogram.bins().last().map_or(0.0, |bin| bin.top)),
        );
    }

    let mut writer = create(&config.output)?;
    write_histogram(&mut writer, histogram.bins())
        .and_then(|()| writer.flush())
        .map_err(|source| Error::Write {
            path: config.output.clone(),
            source,
        })?;
    info!(
        "wrote {} bins to {}",
        histogram.bins().len(),
        config.output.display()
    );

    Ok(Summary::new(&analysis, &histogram))
}
