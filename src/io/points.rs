//! Point listings of boundary cycles.
//!
//! Each cycle is written as consecutive `x y z` lines, one per vertex in
//! traversal order. By default cycles follow each other with nothing in
//! between, which is the layout downstream hole-filling scripts expect; a
//! separator line can be enabled to keep cycles apart.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::algo::boundary::BoundaryCycle;
use crate::error::Result;
use crate::mesh::MeshIndex;

/// Layout options for [`write_points`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointListingOptions {
    /// Line written between consecutive cycles, if any.
    pub separator: Option<String>,

    /// Fixed number of decimals. `None` writes the shortest exact form.
    pub precision: Option<usize>,
}

impl PointListingOptions {
    /// Separate cycles with an empty line.
    pub fn separate_cycles(mut self) -> Self {
        self.separator = Some(String::new());
        self
    }

    /// Separate cycles with a custom line.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Write coordinates with a fixed number of decimals.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    fn write_point<W: Write>(&self, writer: &mut W, p: &Point3<f64>) -> std::io::Result<()> {
        match self.precision {
            Some(d) => writeln!(writer, "{:.*} {:.*} {:.*}", d, p.x, d, p.y, d, p.z),
            None => writeln!(writer, "{} {} {}", p.x, p.y, p.z),
        }
    }
}

/// Write the points of `cycles` to `writer`.
pub fn write_points<W: Write, I: MeshIndex>(
    writer: &mut W,
    cycles: &[BoundaryCycle<I>],
    options: &PointListingOptions,
) -> Result<()> {
    for (i, cycle) in cycles.iter().enumerate() {
        if i > 0 {
            if let Some(separator) = &options.separator {
                writeln!(writer, "{}", separator)?;
            }
        }
        for p in &cycle.points {
            options.write_point(writer, p)?;
        }
    }
    Ok(())
}

/// Write the points of `cycles` to a file.
pub fn save_points<P: AsRef<Path>, I: MeshIndex>(
    path: P,
    cycles: &[BoundaryCycle<I>],
    options: &PointListingOptions,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_points(&mut writer, cycles, options)?;
    writer.flush()?;

    log::debug!(
        "wrote {} points in {} cycles to {}",
        cycles.iter().map(|c| c.points.len()).sum::<usize>(),
        cycles.len(),
        path.display()
    );
    Ok(())
}
