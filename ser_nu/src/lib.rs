//! Compact binary serialization, and a cancellable result type.
//!
//! # Wire format
//!
//! * Integers are fixed width and big-endian, whatever the host. `bool` is one
//!   byte (0 or 1), `char` is its scalar value as a `u32`, floats are their
//!   IEEE 754 bits.
//! * `String` is its UTF-8 bytes, and `Vec<T>` its elements back to back. No
//!   length is recorded. Context decides where they end.
//! * Structs are their fields in declaration order. A statically sized field
//!   is never prefixed. Dynamically sized fields are delimited according to
//!   the struct's encoding (see [`structs`]), using length prefixes of a
//!   caller-chosen [`SizeType`], which are themselves big-endian integers.
//!
//! ```
//! use ser_nu::{expand, squash};
//!
//! let fields = (String::from("foobar"), 0x4au32, vec![69u8, 180]);
//! let bytes = squash::<u16, _>(&fields).unwrap();
//! assert_eq!(
//! 	bytes,
//! 	[0, 6, b'f', b'o', b'o', b'b', b'a', b'r', 0, 0, 0, 0x4a, 69, 180]
//! );
//! assert_eq!(expand::<u16, (String, u32, Vec<u8>)>(&bytes).unwrap(), fields);
//! ```
//!
//! # Cancellables
//!
//! [`concurrency`] holds [`Provider`] / [`Cancellable`], a one-shot result
//! shared between a producing thread and any number of consumers, which
//! either side can cancel.

// Allow derive macro output to refer to `::ser_nu` inside this crate's tests
extern crate self as ser_nu;

#[cfg(feature = "derive")]
pub use ser_nu_derive::Serializable;

mod buffer;
pub use buffer::{Data, DataMut, DataRef};

mod error;
pub use error::{Error, Result};

mod serialize;
pub use serialize::{
	append_static, deserialize, expect_len, is_statically_sized, serialize, serialize_static,
	serialized_size, Serializable, StaticallySized,
};

mod size;
pub use size::{DefaultSize, SizeType};

mod impls;

pub mod structs;
pub use structs::{
	expand, expand_dynamic, expand_hybrid, expand_static, squash, squash_dynamic, squash_hybrid,
	squash_static, squash_static_into,
};

pub mod collections;
pub use collections::{expand_seq, squash_seq, Seq};

pub mod concurrency;
pub use concurrency::{Cancellable, CancellableState, Provider};
