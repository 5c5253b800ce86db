// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh export to solver formats

mod elmergrid;

pub use elmergrid::ElmerGridRunner;
