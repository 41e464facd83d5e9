//! Small supporting utilities that do not belong to any one subsystem.

pub mod prng;
