// Copyright 2025 The Gridlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,      // will never be produced
    DoesNotExist, // the named entity doesn't exist
    MismatchedDimensions,
    EmptyShape,
    BadNetwork,
    JsonDeserialization,
    Io,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            MismatchedDimensions => "mismatched_dimensions",
            EmptyShape => "empty_shape",
            BadNetwork => "bad_network",
            JsonDeserialization => "json_deserialization",
            Io => "io",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Model,
    Emit,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Emit,
            code: ErrorCode::Io,
            details: Some(err.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Model => "ModelError",
            ErrorKind::Emit => "EmitError",
            ErrorKind::Variable => "VariableError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Model,
        ErrorCode::MismatchedDimensions,
        Some("(3, 2) vs (2, 2)".to_string()),
    );
    assert_eq!(
        format!("{err}"),
        "ModelError{mismatched_dimensions: (3, 2) vs (2, 2)}"
    );

    let err = Error::new(ErrorKind::Emit, ErrorCode::Io, None);
    assert_eq!(format!("{err}"), "EmitError{io}");
}
