// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Streaming serialization of the optimization model.
//!
//! One `Emitter` is one build session: it owns the three output sinks
//! (objective, bounds, constraints) and the session's symbol counters.  Rows
//! are appended entry by entry so the document never resides in memory; a
//! failed write aborts the session and a retry must start from a fresh
//! `Emitter` over truncated sinks.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::array::{LabeledArray, Operand};
use crate::common::Result;
use crate::format::signed;
use crate::shape::{Resolved, reconcile};
use crate::symbols::SymbolAllocator;

/// Relational operator of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Le => "<=",
            Sense::Eq => "=",
            Sense::Ge => ">=",
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The on-disk locations of a session's three output streams.  Concatenated
/// in order (objective, bounds, constraints) they form the exchange document.
#[derive(Clone, Debug)]
pub struct LpParts {
    pub objective: PathBuf,
    pub bounds: PathBuf,
    pub constraints: PathBuf,
}

impl LpParts {
    pub fn in_dir(dir: &Path) -> LpParts {
        LpParts {
            objective: dir.join("objective.txt"),
            bounds: dir.join("bounds.txt"),
            constraints: dir.join("constraints.txt"),
        }
    }

    /// Concatenate the three parts, in document order, into `out`.
    pub fn assemble(&self, out: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(out)?);
        for part in [&self.objective, &self.bounds, &self.constraints] {
            let mut part = File::open(part)?;
            io::copy(&mut part, &mut out)?;
        }
        out.flush()?;
        Ok(())
    }
}

pub struct Emitter<W: Write> {
    objective: W,
    bounds: W,
    constraints: W,
    alloc: SymbolAllocator,
}

impl Emitter<BufWriter<File>> {
    /// Open a file-backed session.  Sinks are truncated: a session never
    /// resumes a previous document.
    pub fn create(parts: &LpParts) -> Result<Emitter<BufWriter<File>>> {
        Ok(Emitter::new(
            BufWriter::new(File::create(&parts.objective)?),
            BufWriter::new(File::create(&parts.bounds)?),
            BufWriter::new(File::create(&parts.constraints)?),
        ))
    }
}

impl<W: Write> Emitter<W> {
    /// A session over arbitrary sinks, with fresh symbol counters.
    pub fn new(objective: W, bounds: W, constraints: W) -> Emitter<W> {
        Emitter {
            objective,
            bounds,
            constraints,
            alloc: SymbolAllocator::new(),
        }
    }

    pub fn allocator(&self) -> &SymbolAllocator {
        &self.alloc
    }

    /// Tear the session down without flushing, handing back the raw sinks.
    pub fn into_sinks(self) -> (W, W, W) {
        (self.objective, self.bounds, self.constraints)
    }

    /// Append pre-formatted objective terms, one per line, in order.
    pub fn write_objective<I>(&mut self, terms: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for term in terms {
            writeln!(self.objective, "{}", term.as_ref())?;
        }
        Ok(())
    }

    /// Allocate one variable per position of the resolved shape and write its
    /// operating range to the bounds sink.  Returns the variable names on the
    /// resolved axes.
    pub fn write_bound(
        &mut self,
        lower: &Operand<f64>,
        upper: &Operand<f64>,
    ) -> Result<LabeledArray<String>> {
        let Resolved { shape, axes } = reconcile(lower, upper)?;
        let (_, names) = self.alloc.variables(&shape)?;
        let mut idx = vec![0usize; shape.len()];
        for (i, name) in names.iter().enumerate() {
            unravel(&shape, i, &mut idx);
            let lo = signed(*lower.at(&idx), false);
            let up = signed(*upper.at(&idx), false);
            writeln!(self.bounds, "{lo} <= {name} <= {up}")?;
        }
        LabeledArray::new(axes, names)
    }

    /// Allocate one constraint per position of the resolved shape and write
    /// its block to the constraints sink.  Expression text passes through
    /// verbatim; a blank line closes each block.
    pub fn write_constraint(
        &mut self,
        lhs: &Operand<String>,
        sense: Sense,
        rhs: &Operand<String>,
    ) -> Result<LabeledArray<String>> {
        let Resolved { shape, axes } = reconcile(lhs, rhs)?;
        let (_, names) = self.alloc.constraints(&shape)?;
        let mut idx = vec![0usize; shape.len()];
        for (i, name) in names.iter().enumerate() {
            unravel(&shape, i, &mut idx);
            writeln!(self.constraints, "{name}:")?;
            writeln!(self.constraints, "{}", lhs.at(&idx))?;
            writeln!(self.constraints, "{}", sense.as_str())?;
            writeln!(self.constraints, "{}", rhs.at(&idx))?;
            writeln!(self.constraints)?;
        }
        LabeledArray::new(axes, names)
    }

    /// Flush all three sinks, surfacing any deferred write failure.  Dropping
    /// an `Emitter` without calling this still closes the sinks, but errors
    /// are lost.
    pub fn finish(mut self) -> Result<()> {
        self.objective.flush()?;
        self.bounds.flush()?;
        self.constraints.flush()?;
        Ok(())
    }
}

// Row-major index of the flat position `flat` within `shape`.
fn unravel(shape: &[usize], mut flat: usize, idx: &mut [usize]) {
    for d in (0..shape.len()).rev() {
        idx[d] = flat % shape[d];
        flat /= shape[d];
    }
}
