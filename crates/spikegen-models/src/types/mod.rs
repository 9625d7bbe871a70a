// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Model Types
//!
//! Building blocks shared by every model record: typed variables, the
//! C-family type tags they carry, and the kernel precision.

pub mod precision;
pub mod var_type;
pub mod variable;

pub use precision::Precision;
pub use var_type::{IntWidth, VarType};
pub use variable::Variable;
