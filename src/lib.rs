/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation and game rules.
mod board;

/// Command-line interface for the `gambit` binary.
mod cli;

pub use board::*;
pub use cli::*;
