// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — opens the backend crates and hands the UI what it needs to
// display (view-model inputs, capture results, preview images).

pub mod app_services;
pub mod capture;
pub mod data_dir;
pub mod preview;
