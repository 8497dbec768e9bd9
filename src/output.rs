//! Text output: the histogram file and the shell change log.
use std::io::{self, Write};

use crate::histogram::Bin;
use crate::tracker::{Residence, Transition};
use crate::AtomId;

/// Format `value` like C's `%e`: six fractional digits and a signed, at least two digit exponent.
pub fn sci(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "+Inf" } else { "-Inf" });
    }
    let s = format!("{value:.6e}");
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// Each id followed by `", "`, closed by a newline.
pub fn id_list(ids: &[AtomId]) -> String {
    let mut s: String = ids.iter().map(|id| format!("{id}, ")).collect();
    s.push('\n');
    s
}

/// Write one `bottom, center, top, count` line per bin.
pub fn write_histogram<W: Write>(writer: &mut W, bins: &[Bin]) -> io::Result<()> {
    for bin in bins {
        writeln!(
            writer,
            "{}, {}, {}, {}",
            sci(bin.bottom),
            sci(bin.center),
            sci(bin.top),
            bin.count
        )?;
    }
    Ok(())
}

/// The per-frame log of shell membership changes and completed residences.
#[derive(Debug)]
pub struct FrameLog<W> {
    writer: W,
}

impl<W: Write> FrameLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Record the shell of frame `frame` if its membership changed.
    pub fn write_transition(
        &mut self,
        frame: usize,
        current: &[AtomId],
        transition: &Transition,
    ) -> io::Result<()> {
        if transition.is_empty() {
            return Ok(());
        }
        let w = &mut self.writer;
        writeln!(w, "Frame number {frame}:")?;
        writeln!(w, "Current Atoms:")?;
        w.write_all(id_list(current).as_bytes())?;
        if !transition.leaving.is_empty() {
            writeln!(w, "Atoms Leaving")?;
            w.write_all(id_list(&transition.leaving).as_bytes())?;
        }
        if !transition.entering.is_empty() {
            writeln!(w, "Atoms Entering")?;
            w.write_all(id_list(&transition.entering).as_bytes())?;
        }
        Ok(())
    }

    /// Record a completed residence under its index in the completed list.
    pub fn write_residence(&mut self, index: usize, residence: &Residence) -> io::Result<()> {
        writeln!(
            self.writer,
            "Residence #{index}: t = {}({}-{})",
            sci(residence.time),
            residence.first_frame,
            residence.last_frame
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
