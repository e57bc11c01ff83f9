use ser_nu::{
	deserialize, expand_seq, serialize, structs::StaticStruct, Error, Seq, Serializable,
	StaticallySized,
};

mod common;
use common::{assert_round_trip, generate_fleet_data};

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
enum Status {
	Docked = 0,
	Sailing = 1,
	Anchored = 2,
	Salvage = 7,
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[repr(i16)]
enum Delta {
	Down = -1,
	Same = 0,
	Up = 1,
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[repr(u128)]
enum Wide {
	Low = 1,
	High = u128::MAX,
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(fixed)]
struct Point {
	x: i16,
	y: i16,
	visible: bool,
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(fixed)]
struct Reading(Status, f32);

#[derive(Serializable, Debug, PartialEq)]
#[squash(fixed)]
struct Marker;

#[derive(Serializable, Debug, PartialEq)]
#[squash(hybrid)]
struct Packet {
	id: u16,
	flags: u8,
	payload: Vec<u8>,
}

#[derive(Serializable, Debug, PartialEq)]
struct Person {
	name: String,
	age: u8,
	email: String,
}

#[derive(Serializable, Debug, PartialEq)]
#[squash(mixed(u16))]
struct Tagged {
	tag: String,
	count: u32,
}

#[derive(Serializable, Debug, PartialEq)]
struct Header {
	version: u8,
	len: u32,
}

#[derive(Serializable, Debug, PartialEq)]
#[squash(dynamic(u8))]
struct Entry {
	key: String,
	value: Vec<u16>,
}

#[derive(Serializable, Debug, PartialEq)]
#[squash(dynamic(u16))]
struct Coords(u8, u8);

#[derive(Serializable, Debug, PartialEq)]
#[squash(transparent)]
struct Name(String);

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(fixed, transparent)]
struct Meters {
	value: u32,
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(fixed, via(u32))]
struct Rgb {
	r: u8,
	g: u8,
	b: u8,
}

impl From<&Rgb> for u32 {
	fn from(colour: &Rgb) -> u32 {
		(colour.r as u32) << 16 | (colour.g as u32) << 8 | colour.b as u32
	}
}

impl From<u32> for Rgb {
	fn from(value: u32) -> Rgb {
		Rgb {
			r: (value >> 16) as u8,
			g: (value >> 8) as u8,
			b: value as u8,
		}
	}
}

#[derive(Serializable, Debug, PartialEq)]
#[squash(via(String))]
struct Tags {
	tags: Vec<String>,
}

impl From<&Tags> for String {
	fn from(tags: &Tags) -> String {
		tags.tags.join(",")
	}
}

impl From<String> for Tags {
	fn from(joined: String) -> Tags {
		Tags {
			tags: joined.split(',').map(str::to_string).collect(),
		}
	}
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(via(u16))]
enum Cell {
	Empty,
	Filled(u8),
}

impl From<&Cell> for u16 {
	fn from(cell: &Cell) -> u16 {
		match cell {
			Cell::Empty => 0xffff,
			Cell::Filled(n) => *n as u16,
		}
	}
}

impl From<u16> for Cell {
	fn from(value: u16) -> Cell {
		match value {
			0xffff => Cell::Empty,
			n => Cell::Filled(n as u8),
		}
	}
}

#[derive(Serializable, Debug, PartialEq)]
struct Labelled<T> {
	label: String,
	value: T,
}

#[derive(Serializable, Debug, PartialEq)]
#[squash(fixed)]
struct Pair<T>(T, T);

#[derive(Serializable, Debug, PartialEq)]
#[squash(hybrid)]
struct Framed<B> {
	kind: u8,
	body: B,
}

#[test]
fn enums() {
	assert_round_trip(&Status::Docked, &[0]);
	assert_round_trip(&Status::Salvage, &[7]);
	assert_round_trip(&Delta::Down, &[0xff, 0xff]);
	assert_round_trip(&Delta::Same, &[0, 0]);
	assert_round_trip(&Delta::Up, &[0, 1]);
	assert_eq!(<Status as StaticallySized>::SIZE, 1);
	assert_eq!(<Delta as StaticallySized>::SIZE, 2);
}

#[test]
fn enum_unknown_discriminant_is_rejected() {
	assert_eq!(
		deserialize::<Status>(&[3]),
		Err(Error::InvalidDiscriminant {
			type_name: "Status",
			value: "3".to_string()
		})
	);
	assert_eq!(
		deserialize::<Delta>(&[0xff, 0xfe]),
		Err(Error::InvalidDiscriminant {
			type_name: "Delta",
			value: "-2".to_string()
		})
	);
	assert_eq!(
		deserialize::<Status>(&[0, 7]),
		Err(Error::InvalidLength {
			expected: 1,
			actual: 2
		})
	);
}

#[test]
fn wide_enum_discriminants_are_reported_exactly() {
	assert_round_trip(&Wide::Low, &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
	assert_round_trip(&Wide::High, &[0xff; 16]);

	let mut bytes = [0xff; 16];
	bytes[15] = 0xfe;
	assert_eq!(
		deserialize::<Wide>(&bytes),
		Err(Error::InvalidDiscriminant {
			type_name: "Wide",
			value: (u128::MAX - 1).to_string()
		})
	);
}

#[test]
fn fixed_structs() {
	let point = Point {
		x: 1,
		y: -1,
		visible: true,
	};
	assert_round_trip(&point, &[0, 1, 0xff, 0xff, 1]);
	assert_eq!(<Point as StaticallySized>::SIZE, 5);
	assert_eq!(<Point as StaticStruct>::TOTAL_SIZE, 5);

	assert_round_trip(
		&Reading(Status::Sailing, 1.0),
		&[1, 0x3f, 0x80, 0, 0],
	);
	assert_round_trip(&Marker, &[]);

	assert_eq!(
		deserialize::<Point>(&[0, 1, 0xff, 0xff]),
		Err(Error::SizeMismatch {
			expected: 5,
			actual: 4
		})
	);
	assert_eq!(
		deserialize::<Reading>(&[9, 0, 0, 0, 0]),
		Err(Error::InvalidDiscriminant {
			type_name: "Status",
			value: "9".to_string()
		})
	);
}

#[test]
fn fixed_structs_pack_into_vecs() {
	let points = vec![
		Point {
			x: 0x0102,
			y: 0x0304,
			visible: false,
		},
		Point {
			x: 0,
			y: 0,
			visible: true,
		},
	];
	assert_round_trip(&points, &[1, 2, 3, 4, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn hybrid_structs() {
	let packet = Packet {
		id: 5,
		flags: 3,
		payload: vec![0xde, 0xad],
	};
	assert_round_trip(&packet, &[0, 5, 3, 0xde, 0xad]);
	assert_eq!(Packet::SERIALIZED_SIZE, None);

	let empty = Packet {
		id: 5,
		flags: 3,
		payload: vec![],
	};
	assert_round_trip(&empty, &[0, 5, 3]);
}

#[test]
fn mixed_structs_default_to_u32_prefixes() {
	let person = Person {
		name: "bob".to_string(),
		age: 30,
		email: "b@x".to_string(),
	};
	assert_round_trip(&person, &[0, 0, 0, 3, b'b', b'o', b'b', 30, b'b', b'@', b'x']);
}

#[test]
fn mixed_structs_with_chosen_prefix() {
	let tagged = Tagged {
		tag: "tag".to_string(),
		count: 5,
	};
	assert_round_trip(&tagged, &[0, 3, b't', b'a', b'g', 0, 0, 0, 5]);
}

#[test]
fn mixed_structs_of_static_fields_have_known_size() {
	assert_eq!(Header::SERIALIZED_SIZE, Some(5));
	assert_round_trip(&Header { version: 1, len: 9 }, &[1, 0, 0, 0, 9]);
}

#[test]
fn dynamic_structs() {
	let entry = Entry {
		key: "key".to_string(),
		value: vec![1, 2],
	};
	assert_round_trip(&entry, &[3, b'k', b'e', b'y', 0, 1, 0, 2]);

	// Header means size is never static
	assert_eq!(Coords::SERIALIZED_SIZE, None);
	assert_round_trip(&Coords(4, 2), &[0, 1, 4, 2]);
	assert_eq!(
		deserialize::<Coords>(&[0, 2, 4, 2]),
		Err(Error::InvalidLength {
			expected: 1,
			actual: 2
		})
	);
}

#[test]
fn transparent_structs() {
	assert_round_trip(&Name("Ishmael".to_string()), b"Ishmael");
	assert_eq!(Name::SERIALIZED_SIZE, None);

	assert_round_trip(&Meters { value: 0x0102 }, &[0, 0, 1, 2]);
	assert_eq!(<Meters as StaticallySized>::SIZE, 4);
	assert_round_trip(
		&vec![Meters { value: 1 }, Meters { value: 2 }],
		&[0, 0, 0, 1, 0, 0, 0, 2],
	);
}

#[test]
fn via_structs() {
	assert_round_trip(
		&Rgb {
			r: 0x12,
			g: 0x34,
			b: 0x56,
		},
		&[0, 0x12, 0x34, 0x56],
	);
	assert_eq!(<Rgb as StaticallySized>::SIZE, 4);

	assert_round_trip(
		&Tags {
			tags: vec!["sea".to_string(), "salt".to_string()],
		},
		b"sea,salt",
	);
	assert_eq!(Tags::SERIALIZED_SIZE, None);
}

#[test]
fn via_enums() {
	assert_round_trip(&Cell::Filled(5), &[0, 5]);
	assert_round_trip(&Cell::Empty, &[0xff, 0xff]);
	assert_eq!(Cell::SERIALIZED_SIZE, Some(2));
}

#[test]
fn generic_structs() {
	assert_round_trip(
		&Labelled {
			label: "n".to_string(),
			value: 7u32,
		},
		&[0, 0, 0, 1, b'n', 0, 0, 0, 7],
	);
	assert_round_trip(
		&Labelled {
			label: "v".to_string(),
			value: vec![1u16, 2],
		},
		&[0, 0, 0, 1, b'v', 0, 1, 0, 2],
	);

	assert_round_trip(&Pair(1u16, 2u16), &[0, 1, 0, 2]);
	assert_eq!(<Pair<u64> as StaticallySized>::SIZE, 16);

	assert_round_trip(
		&Framed {
			kind: 2,
			body: "hi".to_string(),
		},
		&[2, b'h', b'i'],
	);
	assert_eq!(<Framed<u16>>::SERIALIZED_SIZE, Some(3));
}

#[test]
fn derived_structs_nest() {
	let people = Seq::<Person, u8>::new(vec![
		Person {
			name: "a".to_string(),
			age: 1,
			email: String::new(),
		},
		Person {
			name: String::new(),
			age: 2,
			email: "c".to_string(),
		},
	]);
	assert_round_trip(
		&people,
		&[
			6, 0, 0, 0, 1, b'a', 1, // first person
			6, 0, 0, 0, 0, 2, b'c', // second person
		],
	);
	assert_eq!(
		expand_seq::<u8, Person>(&serialize(&people).unwrap()).unwrap(),
		people.items
	);
}

#[test]
fn fleet_round_trip() {
	let fleet = generate_fleet_data();
	assert_eq!(fleet.vessels.items.len(), 200);

	let bytes = fleet.serialize().unwrap();
	// Deterministic
	assert_eq!(fleet.serialize().unwrap(), bytes);
	assert_eq!(deserialize::<common::Fleet>(&bytes).unwrap(), fleet);

	// Every vessel on its own too
	for vessel in &fleet.vessels.items {
		let vessel_bytes = serialize(vessel).unwrap();
		assert_eq!(&deserialize::<common::Vessel>(&vessel_bytes).unwrap(), vessel);
	}
}

#[test]
fn truncated_fleet_is_rejected() {
	let bytes = generate_fleet_data().serialize().unwrap();
	assert!(deserialize::<common::Fleet>(&bytes[..bytes.len() - 1]).is_err());
}
