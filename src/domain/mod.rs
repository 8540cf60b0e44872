// Domain layer: value types and the remote API port. No I/O here.

pub mod model;
pub mod ports;
