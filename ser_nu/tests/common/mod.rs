#![allow(dead_code)]

use std::fmt::Debug;

use ser_nu::Serializable;

mod fleet_data;
pub use fleet_data::{generate_data as generate_fleet_data, Fleet, Vessel};

/// Serialize `input`, check the encoding, and check it deserializes back to
/// `input`.
pub fn assert_round_trip<T>(input: &T, expected: &[u8])
where T: Serializable + Debug + PartialEq {
	let bytes = input.serialize().unwrap();
	assert_eq!(bytes, expected);
	if let Some(size) = T::SERIALIZED_SIZE {
		assert_eq!(bytes.len(), size);
	}
	assert_eq!(&T::deserialize(&bytes).unwrap(), input);
}
