use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use glam::DVec3;
use log::{debug, warn};

use crate::config::Config;
use crate::{Atom, AtomId, Frame};

/// What a single trajectory line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// An atom row: `id element x y z type ...`.
    Atom(Atom),
    /// A line with exactly one field. It closes the current frame.
    Separator,
    /// Headers, box lines, and everything else.
    Other,
}

/// Classify a line and, for atom rows, parse it.
///
/// A line is an atom row if it has more than five whitespace separated fields and does not
/// contain `box_marker`. The box line of a frame has the same shape as an atom row, which is the
/// only reason the marker exists.
pub fn parse_line(line: &str, box_marker: &str) -> Record {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() > 5 && !line.contains(box_marker) {
        Record::Atom(parse_atom(&fields))
    } else if fields.len() == 1 {
        Record::Separator
    } else {
        Record::Other
    }
}

/// Build an [`Atom`] from the fields of an atom row.
///
/// Numeric fields that fail to parse become zero.
///
/// # Panics
///
/// Panics if fewer than six fields are given.
pub fn parse_atom(fields: &[&str]) -> Atom {
    let float = |s: &str| s.parse::<f64>().unwrap_or_default();
    Atom {
        id: fields[0].parse().unwrap_or_default(),
        element: fields[1].to_string(),
        position: DVec3::new(float(fields[2]), float(fields[3]), float(fields[4])),
        kind: fields[5].to_string(),
    }
}

/// The geometric parameters that decide shell membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub center_id: AtomId,
    pub radius: f64,
    pub element: String,
    pub box_marker: String,
}

impl From<&Config> for Shell {
    fn from(config: &Config) -> Self {
        Self {
            center_id: config.center_id,
            radius: config.shell_radius,
            element: config.shell_element.clone(),
            box_marker: config.box_marker.clone(),
        }
    }
}

/// Reads a text trajectory one frame at a time.
///
/// The structure center is carried over between frames. It starts at the origin and only moves
/// when the center atom is read, so oxygens that precede the center atom in a frame are measured
/// against the previous frame's center.
#[derive(Debug)]
pub struct ArcReader<R> {
    reader: R,
    shell: Shell,
    center: DVec3,
    nframes: usize,
    line: Vec<u8>,
}

impl ArcReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, shell: Shell) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), shell))
    }
}

impl<R: BufRead> ArcReader<R> {
    pub fn new(reader: R, shell: Shell) -> Self {
        Self {
            reader,
            shell,
            center: DVec3::ZERO,
            nframes: 0,
            line: Vec::new(),
        }
    }

    /// The number of frames read so far.
    pub fn nframes(&self) -> usize {
        self.nframes
    }

    /// Reads the next [`Frame`] into `frame`.
    ///
    /// Returns an error of kind [`io::ErrorKind::UnexpectedEof`] once the trajectory is exhausted.
    /// Atom rows after the last separator never make up a frame and are discarded.
    pub fn read_frame(&mut self, frame: &mut Frame) -> io::Result<()> {
        frame.atoms.clear();
        frame.shell.clear();
        let mut duplicates = 0;

        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                if !frame.atoms.is_empty() {
                    debug!(
                        "discarding {} atoms after the last frame separator",
                        frame.atoms.len()
                    );
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no more frames in trajectory",
                ));
            }

            let line = String::from_utf8_lossy(strip_newline(&self.line));
            match parse_line(&line, &self.shell.box_marker) {
                Record::Atom(atom) => {
                    if atom.id == self.shell.center_id {
                        self.center = atom.position;
                    } else if atom.element == self.shell.element
                        && self.center.distance(atom.position) < self.shell.radius
                    {
                        frame.shell.push(atom.id);
                    }
                    if frame.atoms.insert(atom.id, atom).is_some() {
                        duplicates += 1;
                    }
                }
                Record::Separator => {
                    self.nframes += 1;
                    frame.index = self.nframes;
                    frame.center = self.center;
                    if duplicates > 0 {
                        warn!(
                            "frame {} repeats {duplicates} atom ids, residences keyed by these ids may be wrong",
                            frame.index
                        );
                    }
                    return Ok(());
                }
                Record::Other => {}
            }
        }
    }
}

fn strip_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
