//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # bplist00
//!
//! A native Rust encoder and decoder for Apple's binary property list
//! (`bplist00`) format: a self-contained, random-access, type-tagged object
//! graph serialization.
//!
//! The core API works directly against [`Value`], the crate's own tagged
//! union covering every wire-format type:
//!
//! ```
//! use bplist00::Value;
//!
//! let document = bplist00::to_vec(&Value::Array(vec![
//!     Value::Int(1),
//!     Value::string("hello"),
//! ])).unwrap();
//!
//! let decoded = bplist00::from_slice(&document).unwrap();
//! assert_eq!(decoded, Value::Array(vec![Value::Int(1), Value::string("hello")]));
//! ```
//!
//! [`serde_compat`] additionally bridges arbitrary `Serialize`/`Deserialize`
//! types through [`Value`], the way `serde_json` and `toml` do for their own
//! value types.

mod document;
mod error;
mod pool;
mod value;
mod width;

pub mod decode;
pub mod encode;
pub mod serde_compat;

pub use decode::{from_reader, from_slice};
pub use encode::{to_vec, to_writer};
pub use error::{Error, Result};
pub use value::{Date, Uid, Value};
