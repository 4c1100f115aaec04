// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The in-memory snapshot of the host network model, and the narrow
//! capability interface the emitter core is allowed to touch it through.
//!
//! A `Network` holds one flat per-entity `Table` per component class plus any
//! number of named time tables (snapshots-by-entities).  The emitter core
//! never reaches past the `HostModel` trait, so an adapter over a different
//! host representation can be dropped in without touching the core.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::array::{Axis, LabeledArray};
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::{model_err, var_err};

/// One typed column of a flat table, aligned to the table's entity index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_default(&mut self) {
        match self {
            Column::Float(v) => v.push(f64::NAN),
            Column::Bool(v) => v.push(false),
            Column::Text(v) => v.push(String::new()),
        }
    }
}

/// Flat per-entity table of one component class.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub index: Vec<String>,
    pub columns: BTreeMap<String, Column>,
}

impl Table {
    pub fn new<S: Into<String>>(index: Vec<S>) -> Table {
        Table {
            index: index.into_iter().map(|e| e.into()).collect(),
            columns: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn position(&self, entity: &str) -> Option<usize> {
        self.index.iter().position(|e| e == entity)
    }

    pub fn insert_column(&mut self, name: &str, column: Column) -> Result<()> {
        if column.len() != self.index.len() {
            return model_err!(
                BadNetwork,
                format!(
                    "column {name} has {} values for {} entities",
                    column.len(),
                    self.index.len()
                )
            );
        }
        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    pub fn float_column(&self, name: &str) -> Result<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Float(v)) => Ok(v),
            Some(_) => model_err!(BadNetwork, format!("column {name} is not numeric")),
            None => var_err!(DoesNotExist, name.to_string()),
        }
    }

    pub fn bool_column(&self, name: &str) -> Result<&[bool]> {
        match self.columns.get(name) {
            Some(Column::Bool(v)) => Ok(v),
            Some(_) => model_err!(BadNetwork, format!("column {name} is not boolean")),
            None => var_err!(DoesNotExist, name.to_string()),
        }
    }

    pub fn text_column(&self, name: &str) -> Result<&[String]> {
        match self.columns.get(name) {
            Some(Column::Text(v)) => Ok(v),
            Some(_) => model_err!(BadNetwork, format!("column {name} is not text")),
            None => var_err!(DoesNotExist, name.to_string()),
        }
    }

    /// Values of a numeric column for the given entities, in their order.
    pub fn float_values(&self, name: &str, entities: &[String]) -> Result<Vec<f64>> {
        let column = self.float_column(name)?;
        let mut values = Vec::with_capacity(entities.len());
        for entity in entities {
            match self.position(entity) {
                Some(pos) => values.push(column[pos]),
                None => return var_err!(DoesNotExist, entity.clone()),
            }
        }
        Ok(values)
    }

    /// Append an entity to the index, padding every column with its
    /// missing-cell default.  Returns the new row position.
    pub fn push_entity(&mut self, entity: &str) -> usize {
        self.index.push(entity.to_string());
        for column in self.columns.values_mut() {
            column.push_default();
        }
        self.index.len() - 1
    }

    /// Overwrite-by-index assignment of one text cell, creating the column
    /// and/or the entity row as needed.
    pub fn set_text(&mut self, name: &str, entity: &str, value: String) -> Result<()> {
        let row = match self.position(entity) {
            Some(pos) => pos,
            None => self.push_entity(entity),
        };
        let column = self
            .columns
            .entry(name.to_string())
            .or_insert_with(|| Column::Text(vec![String::new(); row + 1]));
        match column {
            Column::Text(v) => {
                // a column created before this row existed still needs padding
                while v.len() < self.index.len() {
                    v.push(String::new());
                }
                v[row] = value;
                Ok(())
            }
            _ => model_err!(BadNetwork, format!("column {name} is not text")),
        }
    }
}

/// Snapshots-by-entities table attached to a component class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimeTable {
    Float(LabeledArray<f64>),
    Text(LabeledArray<String>),
}

impl TimeTable {
    fn ndim(&self) -> usize {
        match self {
            TimeTable::Float(a) => a.ndim(),
            TimeTable::Text(a) => a.ndim(),
        }
    }

    fn rows(&self) -> usize {
        match self {
            TimeTable::Float(a) => a.axis(0).len(),
            TimeTable::Text(a) => a.axis(0).len(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    pub table: Table,
    pub time_tables: BTreeMap<String, TimeTable>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub snapshots: Vec<String>,
    pub components: BTreeMap<String, ComponentData>,
}

impl Network {
    pub fn new<S: Into<String>>(name: &str, snapshots: Vec<S>) -> Network {
        Network {
            name: name.to_string(),
            snapshots: snapshots.into_iter().map(|s| s.into()).collect(),
            components: BTreeMap::new(),
        }
    }

    pub fn add_class(&mut self, class: &str, table: Table) {
        self.components.insert(
            class.to_string(),
            ComponentData {
                table,
                time_tables: BTreeMap::new(),
            },
        );
    }

    pub fn from_json(json: &str) -> Result<Network> {
        serde_json::from_str(json).map_err(|err| {
            Error::new(
                ErrorKind::Model,
                ErrorCode::JsonDeserialization,
                Some(err.to_string()),
            )
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            Error::new(
                ErrorKind::Model,
                ErrorCode::JsonDeserialization,
                Some(err.to_string()),
            )
        })
    }
}

/// The capability interface the emitter core uses to read and annotate the
/// host model.
pub trait HostModel {
    fn snapshots(&self) -> &[String];
    fn table(&self, class: &str) -> Result<&Table>;
    fn table_mut(&mut self, class: &str) -> Result<&mut Table>;
    fn time_table(&self, class: &str, attr: &str) -> Option<&TimeTable>;
    fn time_table_mut(&mut self, class: &str, attr: &str) -> Option<&mut TimeTable>;
    fn set_time_table(&mut self, class: &str, attr: &str, table: TimeTable) -> Result<()>;
}

impl HostModel for Network {
    fn snapshots(&self) -> &[String] {
        &self.snapshots
    }

    fn table(&self, class: &str) -> Result<&Table> {
        match self.components.get(class) {
            Some(data) => Ok(&data.table),
            None => model_err!(DoesNotExist, class.to_string()),
        }
    }

    fn table_mut(&mut self, class: &str) -> Result<&mut Table> {
        match self.components.get_mut(class) {
            Some(data) => Ok(&mut data.table),
            None => model_err!(DoesNotExist, class.to_string()),
        }
    }

    fn time_table(&self, class: &str, attr: &str) -> Option<&TimeTable> {
        self.components.get(class)?.time_tables.get(attr)
    }

    fn time_table_mut(&mut self, class: &str, attr: &str) -> Option<&mut TimeTable> {
        self.components.get_mut(class)?.time_tables.get_mut(attr)
    }

    fn set_time_table(&mut self, class: &str, attr: &str, table: TimeTable) -> Result<()> {
        if table.ndim() != 2 || table.rows() != self.snapshots.len() {
            return model_err!(
                BadNetwork,
                format!("{class}.{attr} must be snapshots-by-entities")
            );
        }
        match self.components.get_mut(class) {
            Some(data) => {
                data.time_tables.insert(attr.to_string(), table);
                Ok(())
            }
            None => model_err!(DoesNotExist, class.to_string()),
        }
    }
}

/// Attribute `attr` of `class` as a dense snapshots-by-entities array: an
/// explicit time table wins, otherwise a static numeric column repeats across
/// all snapshots.
pub fn as_dense(model: &impl HostModel, class: &str, attr: &str) -> Result<LabeledArray<f64>> {
    if let Some(table) = model.time_table(class, attr) {
        return match table {
            TimeTable::Float(values) => Ok(values.clone()),
            TimeTable::Text(_) => model_err!(BadNetwork, format!("{class}.{attr} is not numeric")),
        };
    }
    let table = model.table(class)?;
    let column = table.float_column(attr)?;
    let snapshots = model.snapshots();
    let mut data = Vec::with_capacity(snapshots.len() * column.len());
    for _ in snapshots {
        data.extend_from_slice(column);
    }
    LabeledArray::new(
        vec![
            Axis::new("snapshot", snapshots.to_vec()),
            Axis::new(class, table.index.clone()),
        ],
        data,
    )
}
