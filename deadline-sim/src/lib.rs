/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! deadline-sim – replays random tasks against partition execution traces to
//! estimate how often deadlines are met under a given launch table.
//!
//! ```text
//! lib.rs
//! ├── trace/   – counter log parsing and sample search
//! ├── task/    – synthetic task generation and replay
//! └── sweep/   – density sweep and CSV output
//! ```

pub mod sweep;
pub mod task;
pub mod trace;
