// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Labeled arrays: the tabular quantities a network model is made of.
//!
//! A `LabeledArray` is a row-major flat buffer plus zero, one or two axes.
//! Zero axes means a scalar (exactly one element); one axis is a per-entity
//! series; two axes is a time-by-entity frame.  Axis labels only need to be
//! unique within their own axis.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::common::Result;
use crate::{model_err, var_err};

/// Extents of an array, one entry per axis.  Empty means scalar.
pub type Shape = SmallVec<[usize; 2]>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub labels: Vec<String>,
}

impl Axis {
    pub fn new<S: Into<String>>(name: &str, labels: Vec<S>) -> Axis {
        Axis {
            name: name.to_string(),
            labels: labels.into_iter().map(|l| l.into()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of a label along this axis, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledArray<T> {
    axes: Vec<Axis>,
    data: Vec<T>,
}

impl<T> LabeledArray<T> {
    /// A zero-axis array holding exactly one value.
    pub fn scalar(value: T) -> LabeledArray<T> {
        LabeledArray {
            axes: Vec::new(),
            data: vec![value],
        }
    }

    /// Build an array from axes and row-major data.  The element count must
    /// equal the product of the axis lengths (one for zero axes).
    pub fn new(axes: Vec<Axis>, data: Vec<T>) -> Result<LabeledArray<T>> {
        let expected: usize = axes.iter().map(Axis::len).product();
        if data.len() != expected {
            return model_err!(
                MismatchedDimensions,
                format!("{} elements for {} axis positions", data.len(), expected)
            );
        }
        Ok(LabeledArray { axes, data })
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn shape(&self) -> Shape {
        self.axes.iter().map(Axis::len).collect()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, dim: usize) -> &Axis {
        &self.axes[dim]
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Element at a full index, row-major.  The index must have one entry per
    /// axis and be in range.
    pub fn get(&self, idx: &[usize]) -> &T {
        debug_assert_eq!(idx.len(), self.axes.len());
        let mut offset = 0;
        for (d, &i) in idx.iter().enumerate() {
            debug_assert!(i < self.axes[d].len());
            offset = offset * self.axes[d].len() + i;
        }
        &self.data[offset]
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> LabeledArray<U> {
        LabeledArray {
            axes: self.axes.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> LabeledArray<T> {
    /// Restrict the entity (last) axis to the given labels, in their order.
    pub fn select(&self, labels: &[String]) -> Result<LabeledArray<T>> {
        let Some(entity_axis) = self.axes.last() else {
            return model_err!(MismatchedDimensions, "a scalar has no entity axis".to_string());
        };
        let mut positions = Vec::with_capacity(labels.len());
        for label in labels {
            match entity_axis.position(label) {
                Some(pos) => positions.push(pos),
                None => return var_err!(DoesNotExist, label.clone()),
            }
        }
        let cols = entity_axis.len();
        let rows = self.data.len() / cols;
        let mut data = Vec::with_capacity(rows * positions.len());
        for row in 0..rows {
            for &pos in &positions {
                data.push(self.data[row * cols + pos].clone());
            }
        }
        let mut axes = self.axes.clone();
        *axes.last_mut().unwrap() = Axis::new(&entity_axis.name, labels.to_vec());
        Ok(LabeledArray { axes, data })
    }

    /// Merge another two-axis array into this one by entity column: columns
    /// present in both are overwritten, columns only in `other` are appended.
    /// Both arrays must share the leading (time) axis length.
    pub fn merge_columns(&mut self, other: &LabeledArray<T>) -> Result<()> {
        if self.ndim() != 2 || other.ndim() != 2 || self.axes[0].len() != other.axes[0].len() {
            return model_err!(
                MismatchedDimensions,
                format!("{:?} vs {:?}", self.shape(), other.shape())
            );
        }
        let rows = self.axes[0].len();
        let old_cols = self.axes[1].len();

        let mut labels = self.axes[1].labels.clone();
        let mut targets = Vec::with_capacity(other.axes[1].len());
        for label in &other.axes[1].labels {
            match self.axes[1].position(label) {
                Some(pos) => targets.push(pos),
                None => {
                    targets.push(labels.len());
                    labels.push(label.clone());
                }
            }
        }

        let new_cols = labels.len();
        let mut data: Vec<T> = Vec::with_capacity(rows * new_cols);
        for row in 0..rows {
            for col in 0..new_cols {
                let value = if col < old_cols {
                    self.data[row * old_cols + col].clone()
                } else {
                    // freshly appended column; filled from `other` below
                    other.data[row * other.axes[1].len()].clone()
                };
                data.push(value);
            }
        }
        for (src_col, &dst_col) in targets.iter().enumerate() {
            for row in 0..rows {
                data[row * new_cols + dst_col] = other.data[row * other.axes[1].len() + src_col].clone();
            }
        }

        self.axes[1] = Axis::new(&self.axes[1].name, labels);
        self.data = data;
        Ok(())
    }
}

impl LabeledArray<f64> {
    /// Scale every entity column by its own factor; `factors` is aligned to
    /// the entity (last) axis.
    pub fn mul_columns(&self, factors: &[f64]) -> Result<LabeledArray<f64>> {
        let Some(entity_axis) = self.axes.last() else {
            return model_err!(MismatchedDimensions, "a scalar has no entity axis".to_string());
        };
        let cols = entity_axis.len();
        if factors.len() != cols {
            return model_err!(
                MismatchedDimensions,
                format!("{} factors for {cols} columns", factors.len())
            );
        }
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| v * factors[i % cols])
            .collect();
        Ok(LabeledArray {
            axes: self.axes.clone(),
            data,
        })
    }
}

/// An input to the emitter: a bare scalar or a labeled array.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand<T> {
    Scalar(T),
    Array(LabeledArray<T>),
}

impl<T> Operand<T> {
    pub fn array(&self) -> Option<&LabeledArray<T>> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Array(a) => Some(a),
        }
    }

    /// Value at a position of the resolved output shape.  A scalar answers
    /// everywhere; a one-axis array under a two-axis output broadcasts across
    /// the leading (time) axis.
    pub(crate) fn at(&self, idx: &[usize]) -> &T {
        match self {
            Operand::Scalar(v) => v,
            Operand::Array(a) if a.ndim() == idx.len() => a.get(idx),
            Operand::Array(a) => {
                debug_assert!(a.ndim() == 1 && idx.len() == 2);
                a.get(&idx[1..])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> LabeledArray<f64> {
        LabeledArray::new(
            vec![
                Axis::new("snapshot", vec!["t0", "t1"]),
                Axis::new("Generator", vec!["g1", "g2", "g3"]),
            ],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn row_major_indexing() {
        let a = frame();
        assert_eq!(a.shape().as_slice(), &[2, 3]);
        assert_eq!(*a.get(&[0, 0]), 1.0);
        assert_eq!(*a.get(&[0, 2]), 3.0);
        assert_eq!(*a.get(&[1, 1]), 5.0);
    }

    #[test]
    fn element_count_must_match_axes() {
        let err = LabeledArray::new(
            vec![Axis::new("snapshot", vec!["t0", "t1"])],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::MismatchedDimensions);
    }

    #[test]
    fn scalar_has_no_axes() {
        let a = LabeledArray::scalar(7.5);
        assert_eq!(a.ndim(), 0);
        assert_eq!(a.len(), 1);
        assert_eq!(*a.get(&[]), 7.5);
    }

    #[test]
    fn select_reorders_columns() {
        let a = frame();
        let b = a
            .select(&["g3".to_string(), "g1".to_string()])
            .unwrap();
        assert_eq!(b.shape().as_slice(), &[2, 2]);
        assert_eq!(b.data(), &[3.0, 1.0, 6.0, 4.0]);
        assert_eq!(b.axis(1).labels, vec!["g3", "g1"]);
    }

    #[test]
    fn select_unknown_label_fails() {
        let err = frame().select(&["g9".to_string()]).unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::DoesNotExist);
    }

    #[test]
    fn mul_columns_scales_per_entity() {
        let a = frame();
        let b = a.mul_columns(&[10.0, 100.0, 1000.0]).unwrap();
        assert_eq!(b.data(), &[10.0, 200.0, 3000.0, 40.0, 500.0, 6000.0]);
    }

    #[test]
    fn merge_overwrites_and_appends_columns() {
        let mut a = LabeledArray::new(
            vec![
                Axis::new("snapshot", vec!["t0", "t1"]),
                Axis::new("Generator", vec!["g1", "g2"]),
            ],
            vec!["x0", "x1", "x2", "x3"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
        .unwrap();
        let b = LabeledArray::new(
            vec![
                Axis::new("snapshot", vec!["t0", "t1"]),
                Axis::new("Generator", vec!["g2", "g3"]),
            ],
            vec!["y0", "y1", "y2", "y3"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
        .unwrap();
        a.merge_columns(&b).unwrap();
        assert_eq!(a.axis(1).labels, vec!["g1", "g2", "g3"]);
        assert_eq!(a.data(), &["x0", "y0", "y1", "x2", "y2", "y3"]);
    }

    #[test]
    fn broadcast_access_across_time() {
        let per_entity = Operand::Array(
            LabeledArray::new(
                vec![Axis::new("Generator", vec!["g1", "g2"])],
                vec![10.0, 20.0],
            )
            .unwrap(),
        );
        assert_eq!(*per_entity.at(&[0, 1]), 20.0);
        assert_eq!(*per_entity.at(&[5, 0]), 10.0);
    }
}
