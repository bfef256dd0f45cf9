// Domain layer: records and the ports the store talks through.

pub mod model;
pub mod ports;
