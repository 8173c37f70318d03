//! Serial wire protocol: line decoding and motion clamping.

pub mod frame;
