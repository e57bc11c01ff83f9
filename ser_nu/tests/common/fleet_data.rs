// Randomly generated, but reproducible, dataset exercising every struct
// encoding nested inside each other.

use std::ops;

use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use ser_nu::{Seq, Serializable};

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
pub enum Status {
	Docked = 0,
	Sailing = 1,
	Anchored = 2,
	Salvage = 7,
}

impl Generate for Status {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		match rng.gen_range(0..4) {
			0 => Status::Docked,
			1 => Status::Sailing,
			2 => Status::Anchored,
			3 => Status::Salvage,
			_ => unreachable!(),
		}
	}
}

#[derive(Serializable, Clone, Copy, Debug, PartialEq)]
#[squash(fixed)]
pub struct Position {
	pub lat: f64,
	pub lon: f64,
	pub heading: u16,
}

impl Generate for Position {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		Self {
			lat: rng.gen_range(-90.0..90.0),
			lon: rng.gen_range(-180.0..180.0),
			heading: rng.gen_range(0..360),
		}
	}
}

#[derive(Serializable, Clone, Debug, PartialEq)]
#[squash(hybrid)]
pub struct Cargo {
	pub weight: u32,
	pub hazardous: bool,
	pub label: String,
}

impl Generate for Cargo {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const LABELS: [&str; 8] = [
			"grain", "timber", "copper ore", "rice", "coal", "", "spare parts", "wine",
		];
		Self {
			weight: rng.gen(),
			hazardous: rng.gen_bool(0.1),
			label: pick(rng, &LABELS),
		}
	}
}

#[derive(Serializable, Clone, Debug, PartialEq)]
#[squash(dynamic(u16))]
pub struct Log {
	pub entries: Seq<String, u16>,
	pub author: String,
}

impl Generate for Log {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const ENTRIES: [&str; 6] = [
			"left port",
			"storm to the north",
			"engine check ok",
			"man overboard drill",
			"",
			"arrived",
		];
		const AUTHORS: [&str; 3] = ["captain", "first mate", "bosun"];
		const MAX_ENTRIES: usize = 12;
		Self {
			entries: Seq::new(
				generate_vec::<_, ()>(rng, 0..MAX_ENTRIES)
					.iter()
					.map(|_| pick(rng, &ENTRIES))
					.collect(),
			),
			author: pick(rng, &AUTHORS),
		}
	}
}

#[derive(Serializable, Clone, Debug, PartialEq)]
pub struct Vessel {
	pub name: String,
	pub status: Status,
	pub position: Position,
	pub crew: u16,
	pub registry: [u8; 4],
	pub cargo: Seq<Cargo>,
	pub readings: Vec<f32>,
	pub log: Log,
	pub notes: String,
}

impl Generate for Vessel {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const NAMES: [&str; 6] = [
			"Endeavour",
			"Kon-Tiki",
			"Mary Rose",
			"Pequod",
			"Nautilus",
			"Golden Hind",
		];
		const MAX_CARGO: usize = 20;
		const MAX_READINGS: usize = 50;
		Self {
			name: pick(rng, &NAMES),
			status: Status::generate(rng),
			position: Position::generate(rng),
			crew: rng.gen(),
			registry: <[u8; 4] as Generate>::generate(rng),
			cargo: Seq::new(generate_vec(rng, 0..MAX_CARGO)),
			readings: generate_vec(rng, 0..MAX_READINGS),
			log: Log::generate(rng),
			notes: if rng.gen_bool(0.5) {
				String::new()
			} else {
				"needs repainting".to_string()
			},
		}
	}
}

#[derive(Serializable, Clone, Debug, PartialEq)]
#[squash(transparent)]
pub struct Fleet {
	pub vessels: Seq<Vessel>,
}

pub trait Generate {
	fn generate<R: Rng>(rng: &mut R) -> Self;
}

impl Generate for () {
	fn generate<R: Rng>(_: &mut R) -> Self {}
}

impl Generate for bool {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		rng.gen_bool(0.5)
	}
}

macro_rules! impl_generate {
	($($ty:ty),*) => {
		$(
			impl Generate for $ty {
				fn generate<R: Rng>(rng: &mut R) -> Self {
					rng.gen()
				}
			}
		)*
	};
}

impl_generate!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl<T: Generate, const N: usize> Generate for [T; N] {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		std::array::from_fn(|_| T::generate(rng))
	}
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
	options[rng.gen_range(0..options.len())].to_string()
}

pub fn generate_vec<R: Rng, T: Generate>(rng: &mut R, range: ops::Range<usize>) -> Vec<T> {
	let len = rng.gen_range(range);
	(0..len).map(|_| T::generate(rng)).collect()
}

pub fn generate_data() -> Fleet {
	const STATE: u64 = 2718281828;
	const STREAM: u64 = 4590452353;

	let mut rng = Lcg64Xsh32::new(STATE, STREAM);

	const VESSELS: usize = 200;
	Fleet {
		vessels: Seq::new(generate_vec(&mut rng, VESSELS..VESSELS + 1)),
	}
}
