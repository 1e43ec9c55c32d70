// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates initialization, migration and configuration that
//! cannot be expressed in Diesel DSL. All repository reads and writes live
//! in `queries/` and `mutations/`.

pub mod sqlite;
