// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Back-references from the host model to the emitted symbols.
//!
//! After a class's variables or constraints are written, their names are
//! attached to the host tables under the attribute name plus a reserved
//! suffix, so a later stage can find "the symbol for entity i at snapshot t"
//! and swap in the solved value.

use crate::array::{Axis, LabeledArray};
use crate::common::Result;
use crate::datamodel::{HostModel, TimeTable};
use crate::{model_err, var_err};

pub const VAR_REF_SUFFIX: &str = "_varref"; // after solving replace with '_opt'
pub const CON_REF_SUFFIX: &str = "_conref"; // after solving drop the suffix

pub fn set_varref(
    model: &mut impl HostModel,
    symbols: LabeledArray<String>,
    class: &str,
    attr: &str,
) -> Result<()> {
    add_reference(model, symbols, class, attr, VAR_REF_SUFFIX)
}

pub fn set_conref(
    model: &mut impl HostModel,
    symbols: LabeledArray<String>,
    class: &str,
    attr: &str,
) -> Result<()> {
    add_reference(model, symbols, class, attr, CON_REF_SUFFIX)
}

fn add_reference(
    model: &mut impl HostModel,
    symbols: LabeledArray<String>,
    class: &str,
    attr: &str,
    suffix: &str,
) -> Result<()> {
    let name = format!("{attr}{suffix}");
    match symbols.ndim() {
        1 => {
            let table = model.table_mut(class)?;
            for (entity, symbol) in symbols.axis(0).labels.iter().zip(symbols.data()) {
                table.set_text(&name, entity, symbol.clone())?;
            }
            Ok(())
        }
        2 => {
            if let Some(TimeTable::Text(existing)) = model.time_table_mut(class, &name) {
                return existing.merge_columns(&symbols);
            }
            model.set_time_table(class, &name, TimeTable::Text(symbols))
        }
        _ => model_err!(
            MismatchedDimensions,
            format!("reference for {class}.{attr} must have one or two axes")
        ),
    }
}

pub fn static_var_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
) -> Result<LabeledArray<String>> {
    static_refs(model, class, attr, VAR_REF_SUFFIX)
}

pub fn static_con_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
) -> Result<LabeledArray<String>> {
    static_refs(model, class, attr, CON_REF_SUFFIX)
}

pub fn time_var_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
) -> Result<LabeledArray<String>> {
    time_refs(model, class, attr, VAR_REF_SUFFIX)
}

pub fn time_con_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
) -> Result<LabeledArray<String>> {
    time_refs(model, class, attr, CON_REF_SUFFIX)
}

fn static_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
    suffix: &str,
) -> Result<LabeledArray<String>> {
    let table = model.table(class)?;
    let column = table.text_column(&format!("{attr}{suffix}"))?;
    LabeledArray::new(
        vec![Axis::new(class, table.index.clone())],
        column.to_vec(),
    )
}

fn time_refs(
    model: &impl HostModel,
    class: &str,
    attr: &str,
    suffix: &str,
) -> Result<LabeledArray<String>> {
    let name = format!("{attr}{suffix}");
    match model.time_table(class, &name) {
        Some(TimeTable::Text(symbols)) => Ok(symbols.clone()),
        Some(TimeTable::Float(_)) => model_err!(BadNetwork, format!("{class}.{name} is not text")),
        None => var_err!(DoesNotExist, format!("{class}.{name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{Column, Network, Table};

    fn network(entities: Vec<&str>) -> Network {
        let mut network = Network::new("test", vec!["t0", "t1"]);
        let n = entities.len();
        let mut table = Table::new(entities);
        table
            .insert_column("p_nom", Column::Float(vec![1.0; n]))
            .unwrap();
        network.add_class("Generator", table);
        network
    }

    fn series(entities: Vec<&str>, symbols: Vec<&str>) -> LabeledArray<String> {
        LabeledArray::new(
            vec![Axis::new("Generator", entities)],
            symbols.into_iter().map(String::from).collect(),
        )
        .unwrap()
    }

    fn frame(entities: Vec<&str>, symbols: Vec<&str>) -> LabeledArray<String> {
        LabeledArray::new(
            vec![
                Axis::new("snapshot", vec!["t0", "t1"]),
                Axis::new("Generator", entities),
            ],
            symbols.into_iter().map(String::from).collect(),
        )
        .unwrap()
    }

    #[test]
    fn flat_merge_overwrites_by_index() {
        let mut network = network(vec!["a", "b"]);
        set_varref(
            &mut network,
            series(vec!["a", "b"], vec!["x0", "x1"]),
            "Generator",
            "p_nom",
        )
        .unwrap();
        set_varref(
            &mut network,
            series(vec!["b", "c"], vec!["x2", "x3"]),
            "Generator",
            "p_nom",
        )
        .unwrap();

        let refs = static_var_refs(&network, "Generator", "p_nom").unwrap();
        assert_eq!(refs.axis(0).labels, vec!["a", "b", "c"]);
        assert_eq!(refs.data(), &["x0", "x2", "x3"]);
    }

    #[test]
    fn time_merge_replaces_overlapping_columns_only() {
        let mut network = network(vec!["a", "b"]);
        set_conref(
            &mut network,
            frame(vec!["a", "b"], vec!["c0", "c1", "c2", "c3"]),
            "Generator",
            "p",
        )
        .unwrap();
        set_conref(
            &mut network,
            frame(vec!["b", "c"], vec!["c4", "c5", "c6", "c7"]),
            "Generator",
            "p",
        )
        .unwrap();

        let refs = time_con_refs(&network, "Generator", "p").unwrap();
        assert_eq!(refs.axis(1).labels, vec!["a", "b", "c"]);
        // column a keeps the first write, b and c take the second
        assert_eq!(refs.data(), &["c0", "c4", "c5", "c2", "c6", "c7"]);
    }

    #[test]
    fn variable_and_constraint_suffixes_do_not_collide() {
        let mut network = network(vec!["a"]);
        set_varref(&mut network, series(vec!["a"], vec!["x0"]), "Generator", "p").unwrap();
        set_conref(&mut network, series(vec!["a"], vec!["c0"]), "Generator", "p").unwrap();
        assert_eq!(
            static_var_refs(&network, "Generator", "p").unwrap().data(),
            &["x0"]
        );
        assert_eq!(
            static_con_refs(&network, "Generator", "p").unwrap().data(),
            &["c0"]
        );
    }

    #[test]
    fn missing_reference_is_an_error() {
        let network = network(vec!["a"]);
        let err = time_var_refs(&network, "Generator", "p").unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::DoesNotExist);
    }
}
