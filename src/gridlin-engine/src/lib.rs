// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod array;
pub mod bounds;
pub mod builder;
pub mod common;
pub mod datamodel;
pub mod emit;
pub mod format;
pub mod refs;
pub mod shape;
pub mod symbols;

pub use self::array::{Axis, LabeledArray, Operand, Shape};
pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::datamodel::{Column, ComponentData, HostModel, Network, Table, TimeTable, as_dense};
pub use self::emit::{Emitter, LpParts, Sense};
pub use self::shape::{Resolved, reconcile};
pub use self::symbols::SymbolAllocator;
