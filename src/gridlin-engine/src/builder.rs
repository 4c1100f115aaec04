// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Variable definition over whole component classes: range getters feed the
//! shape reconciler, the emitter mints and writes the symbols, and the
//! reference store attaches them back to the host tables.

use std::io::Write;

use crate::array::{Axis, LabeledArray, Operand};
use crate::bounds::{extendable_index, fixed_index, nominal_prefix, operating_range};
use crate::common::Result;
use crate::datamodel::HostModel;
use crate::emit::Emitter;
use crate::refs::set_varref;

/// One bounded variable per snapshot and fixed-capacity entity of `class`,
/// bounded by the per-unit range scaled to nominal capacity.  Returns `None`
/// when the class has no fixed-capacity entities.
pub fn define_operational_variables<W: Write>(
    model: &mut impl HostModel,
    emitter: &mut Emitter<W>,
    class: &str,
    attr: &str,
) -> Result<Option<LabeledArray<String>>> {
    let fixed = fixed_index(model, class)?;
    if fixed.is_empty() {
        return Ok(None);
    }
    let prefix = nominal_prefix(class)?;
    let (lower_pu, upper_pu) = operating_range(model, class, attr, Some(&fixed))?;
    let nominal = model
        .table(class)?
        .float_values(&format!("{prefix}_nom"), &fixed)?;
    let lower = lower_pu.mul_columns(&nominal)?;
    let upper = upper_pu.mul_columns(&nominal)?;
    let variables = emitter.write_bound(&Operand::Array(lower), &Operand::Array(upper))?;
    set_varref(model, variables.clone(), class, attr)?;
    Ok(Some(variables))
}

/// One capacity variable per extendable entity of `class`, bounded by the
/// static nominal limits.  Returns `None` when nothing is extendable.
pub fn define_nominal_variables<W: Write>(
    model: &mut impl HostModel,
    emitter: &mut Emitter<W>,
    class: &str,
) -> Result<Option<LabeledArray<String>>> {
    let extendable = extendable_index(model, class)?;
    if extendable.is_empty() {
        return Ok(None);
    }
    let prefix = nominal_prefix(class)?;
    let attr = format!("{prefix}_nom");
    let (lower, upper) = {
        let table = model.table(class)?;
        let axis = Axis::new(class, extendable.clone());
        (
            LabeledArray::new(
                vec![axis.clone()],
                table.float_values(&format!("{attr}_min"), &extendable)?,
            )?,
            LabeledArray::new(
                vec![axis],
                table.float_values(&format!("{attr}_max"), &extendable)?,
            )?,
        )
    };
    let variables = emitter.write_bound(&Operand::Array(lower), &Operand::Array(upper))?;
    set_varref(model, variables.clone(), class, &attr)?;
    Ok(Some(variables))
}
