// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zmanim derivation engine.
//!
//! - [`catalog`]: definitions, strategies and the validated [`Catalog`].
//! - [`defaults`]: the built-in [`Catalog::standard`].
//! - [`engine`]: [`derive_all`], one forward pass in dependency order.
//! - [`table`]: the resulting [`ZmanimTable`].

pub mod catalog;
pub mod defaults;
pub mod engine;
pub mod table;

pub use catalog::{
    is_primitive, Boundary, Catalog, Convention, Direction, Strategy, ZmanDefinition, PRIMITIVES,
};
pub use defaults::STANDARD_VERSION;
pub use engine::{derive_all, derive_range};
pub use table::ZmanimTable;
