//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! `nom` combinators for the three document segments that aren't part of the
//! object table (`document`), and for the object table's per-format bodies
//! (`object`). `utils` holds the variable-width big-endian integer reader
//! both of those build on.

pub mod document;
pub mod object;
pub mod utils;
