// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Bulk allocation of the symbolic names appearing in the emitted document.
//!
//! Variables are `x<i>`, constraints are `c<i>`, each numbered by its own
//! monotonic counter.  The counters live in a `SymbolAllocator` owned by one
//! build session; a fresh session starts from zero.  Names are rendered
//! straight from the counter range, so no position-to-name map is ever held
//! in memory.

use std::ops::Range;

use crate::common::Result;
use crate::model_err;

#[derive(Clone, Debug, Default)]
struct Counter {
    next: u64,
}

impl Counter {
    fn take(&mut self, count: u64) -> Range<u64> {
        let start = self.next;
        self.next += count;
        start..self.next
    }
}

#[derive(Clone, Debug, Default)]
pub struct SymbolAllocator {
    variables: Counter,
    constraints: Counter,
}

impl SymbolAllocator {
    pub fn new() -> SymbolAllocator {
        Default::default()
    }

    /// Allocate one variable symbol per position of `shape`, row-major.
    /// Returns the half-open counter range and the rendered names.
    pub fn variables(&mut self, shape: &[usize]) -> Result<(Range<u64>, Vec<String>)> {
        let count = block_len(shape)?;
        Ok(render(self.variables.take(count), 'x'))
    }

    /// Allocate one constraint symbol per position of `shape`, row-major.
    pub fn constraints(&mut self, shape: &[usize]) -> Result<(Range<u64>, Vec<String>)> {
        let count = block_len(shape)?;
        Ok(render(self.constraints.take(count), 'c'))
    }

    pub fn variables_allocated(&self) -> u64 {
        self.variables.next
    }

    pub fn constraints_allocated(&self) -> u64 {
        self.constraints.next
    }
}

// An empty shape is a scalar allocation of one symbol; a zero extent is a
// contract violation.
fn block_len(shape: &[usize]) -> Result<u64> {
    let mut count: u64 = 1;
    for &extent in shape {
        if extent == 0 {
            return model_err!(EmptyShape, format!("{shape:?}"));
        }
        count *= extent as u64;
    }
    Ok(count)
}

fn render(range: Range<u64>, prefix: char) -> (Range<u64>, Vec<String>) {
    let names = range.clone().map(|i| format!("{prefix}{i}")).collect();
    (range, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counters_are_independent() {
        let mut alloc = SymbolAllocator::new();
        let (vars, var_names) = alloc.variables(&[2, 3]).unwrap();
        let (cons, con_names) = alloc.constraints(&[2]).unwrap();
        assert_eq!(vars, 0..6);
        assert_eq!(cons, 0..2);
        assert_eq!(var_names[0], "x0");
        assert_eq!(var_names[5], "x5");
        assert_eq!(con_names, vec!["c0", "c1"]);
    }

    #[test]
    fn scalar_allocation_takes_one_symbol() {
        let mut alloc = SymbolAllocator::new();
        let (range, names) = alloc.variables(&[]).unwrap();
        assert_eq!(range, 0..1);
        assert_eq!(names, vec!["x0"]);
    }

    #[test]
    fn zero_extent_is_rejected() {
        let mut alloc = SymbolAllocator::new();
        let err = alloc.variables(&[3, 0]).unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::EmptyShape);
        // the failed call must not have consumed any symbols
        assert_eq!(alloc.variables_allocated(), 0);
    }

    proptest! {
        #[test]
        fn ranges_are_disjoint_and_cover(
            shapes in proptest::collection::vec(proptest::collection::vec(1usize..6, 0..3), 1..8)
        ) {
            let mut alloc = SymbolAllocator::new();
            let mut total = 0u64;
            for shape in &shapes {
                let (range, names) = alloc.variables(shape).unwrap();
                // contiguous with everything allocated before
                prop_assert_eq!(range.start, total);
                let count: u64 = shape.iter().map(|&e| e as u64).product();
                prop_assert_eq!(range.end - range.start, count);
                prop_assert_eq!(names.len() as u64, count);
                total = range.end;
            }
            prop_assert_eq!(alloc.variables_allocated(), total);
            prop_assert_eq!(alloc.constraints_allocated(), 0);
        }
    }
}
