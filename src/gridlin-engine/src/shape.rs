// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Broadcast-shape resolution for emitter operands.
//!
//! The output shape of a bound or constraint write is the operand shape with
//! the larger element count; the output axes come from whichever operand owns
//! that shape, ties preferring the left operand.  Exactly one broadcast form
//! is allowed beyond scalars: a one-axis entity vector against a two-axis
//! time-by-entity frame (the vector repeats across the time axis).  Anything
//! else has no common shape.

use crate::array::{Axis, LabeledArray, Operand, Shape};
use crate::common::Result;
use crate::model_err;

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub shape: Shape,
    pub axes: Vec<Axis>,
}

impl Resolved {
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

pub fn reconcile<T>(left: &Operand<T>, right: &Operand<T>) -> Result<Resolved> {
    match (left.array(), right.array()) {
        (None, None) => Ok(Resolved {
            shape: Shape::new(),
            axes: Vec::new(),
        }),
        (Some(a), None) => Ok(resolved_from(a)),
        (None, Some(b)) => Ok(resolved_from(b)),
        (Some(a), Some(b)) => {
            if a.shape() == b.shape() {
                // equal shapes: the left operand supplies the labels
                return Ok(resolved_from(a));
            }
            if a.len() == b.len() {
                return model_err!(
                    MismatchedDimensions,
                    format!("{:?} vs {:?}", a.shape(), b.shape())
                );
            }
            let (large, small) = if a.len() > b.len() { (a, b) } else { (b, a) };
            if small.ndim() == 1 && large.ndim() == 2 && small.len() == large.shape()[1] {
                Ok(resolved_from(large))
            } else {
                model_err!(
                    MismatchedDimensions,
                    format!("{:?} vs {:?}", a.shape(), b.shape())
                )
            }
        }
    }
}

fn resolved_from<T>(a: &LabeledArray<T>) -> Resolved {
    Resolved {
        shape: a.shape(),
        axes: a.axes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;

    fn series(axis_name: &str, labels: Vec<&str>) -> LabeledArray<f64> {
        let n = labels.len();
        LabeledArray::new(vec![Axis::new(axis_name, labels)], vec![0.0; n]).unwrap()
    }

    fn frame(rows: usize, entities: Vec<&str>) -> LabeledArray<f64> {
        let snapshots: Vec<String> = (0..rows).map(|i| format!("t{i}")).collect();
        let n = rows * entities.len();
        LabeledArray::new(
            vec![
                Axis::new("snapshot", snapshots),
                Axis::new("Generator", entities),
            ],
            vec![0.0; n],
        )
        .unwrap()
    }

    #[test]
    fn two_scalars_resolve_to_scalar() {
        let r = reconcile(&Operand::Scalar(1.0), &Operand::Scalar(2.0)).unwrap();
        assert!(r.is_scalar());
        assert!(r.axes.is_empty());
    }

    #[test]
    fn scalar_against_array_takes_the_array_shape() {
        let a = frame(3, vec!["g1", "g2"]);
        let r = reconcile(&Operand::Scalar(0.0), &Operand::Array(a.clone())).unwrap();
        assert_eq!(r.shape.as_slice(), &[3, 2]);
        assert_eq!(r.axes, a.axes().to_vec());
    }

    #[test]
    fn equal_shapes_prefer_left_labels() {
        let a = series("left", vec!["l1", "l2"]);
        let b = series("right", vec!["r1", "r2"]);
        let r = reconcile(&Operand::Array(a), &Operand::Array(b.clone())).unwrap();
        assert_eq!(r.axes[0].name, "left");
        let r = reconcile(&Operand::Array(b), &Operand::Array(series("left", vec!["l1", "l2"]))).unwrap();
        assert_eq!(r.axes[0].name, "right");
    }

    #[test]
    fn entity_vector_broadcasts_into_a_frame() {
        let v = series("Generator", vec!["g1", "g2"]);
        let f = frame(3, vec!["g1", "g2"]);
        let r = reconcile(&Operand::Array(v), &Operand::Array(f)).unwrap();
        assert_eq!(r.shape.as_slice(), &[3, 2]);
        assert_eq!(r.axes[0].name, "snapshot");
    }

    #[test]
    fn incompatible_shapes_are_rejected() {
        let v = series("Generator", vec!["g1", "g2", "g3"]);
        let f = frame(3, vec!["g1", "g2"]);
        let err = reconcile(&Operand::Array(v), &Operand::Array(f)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MismatchedDimensions);

        // equal element count but different shapes has no common shape either
        let tall = frame(3, vec!["g1", "g2"]);
        let wide = frame(2, vec!["g1", "g2", "g3"]);
        let err = reconcile(&Operand::Array(tall), &Operand::Array(wide)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MismatchedDimensions);
    }
}
