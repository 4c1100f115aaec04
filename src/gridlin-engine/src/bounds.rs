// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Per-unit operating ranges and the extendable/fixed split of a component
//! class.
//!
//! The per-class rules are fixed domain policy: passive branches swing
//! symmetrically around zero, a storage unit's dispatch has a zero floor, and
//! its charging attribute reads the negated minimum series as its ceiling.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::array::LabeledArray;
use crate::common::Result;
use crate::datamodel::{HostModel, as_dense};
use crate::model_err;

lazy_static! {
    // component class -> prefix of its nominal-capacity attribute family
    // (p_nom, p_nom_extendable, p_max_pu, ...)
    static ref NOMINAL_PREFIX: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Generator", "p");
        m.insert("Link", "p");
        m.insert("StorageUnit", "p");
        m.insert("Store", "e");
        m.insert("Line", "s");
        m.insert("Transformer", "s");
        m
    };
}

const PASSIVE_BRANCH_CLASSES: &[&str] = &["Line", "Transformer"];

pub fn nominal_prefix(class: &str) -> Result<&'static str> {
    match NOMINAL_PREFIX.get(class) {
        Some(prefix) => Ok(prefix),
        None => model_err!(
            DoesNotExist,
            format!("no nominal attributes for class {class}")
        ),
    }
}

/// Entities of `class` whose nominal capacity is itself a decision variable.
pub fn extendable_index(model: &impl HostModel, class: &str) -> Result<Vec<String>> {
    partition(model, class, true)
}

/// Entities of `class` with a fixed nominal capacity.
pub fn fixed_index(model: &impl HostModel, class: &str) -> Result<Vec<String>> {
    partition(model, class, false)
}

fn partition(model: &impl HostModel, class: &str, extendable: bool) -> Result<Vec<String>> {
    let prefix = nominal_prefix(class)?;
    let table = model.table(class)?;
    let flags = table.bool_column(&format!("{prefix}_nom_extendable"))?;
    Ok(table
        .index
        .iter()
        .zip(flags)
        .filter(|&(_, &flag)| flag == extendable)
        .map(|(entity, _)| entity.clone())
        .collect())
}

/// Per-unit (lower, upper) operating range of `class` over all snapshots,
/// optionally restricted to `index`.  `attr` selects the storage charging
/// special case; other classes ignore it.
pub fn operating_range(
    model: &impl HostModel,
    class: &str,
    attr: &str,
    index: Option<&[String]>,
) -> Result<(LabeledArray<f64>, LabeledArray<f64>)> {
    let prefix = nominal_prefix(class)?;
    let max_pu = as_dense(model, class, &format!("{prefix}_max_pu"))?;
    let (min_pu, max_pu) = if PASSIVE_BRANCH_CLASSES.contains(&class) {
        (max_pu.map(|&v| -v), max_pu)
    } else if class == "StorageUnit" {
        let min_pu = max_pu.map(|_| 0.0);
        let max_pu = if attr == "p_store" {
            as_dense(model, class, &format!("{prefix}_min_pu"))?.map(|&v| -v)
        } else {
            max_pu
        };
        (min_pu, max_pu)
    } else {
        (
            as_dense(model, class, &format!("{prefix}_min_pu"))?,
            max_pu,
        )
    };
    match index {
        Some(entities) => Ok((min_pu.select(entities)?, max_pu.select(entities)?)),
        None => Ok((min_pu, max_pu)),
    }
}
