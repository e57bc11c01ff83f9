mod other;
mod primitives;

#[cfg(feature = "num_bigint")]
mod bigint;
