// Domain layer: token range, outcomes and the ports adapters implement.

pub mod model;
pub mod ports;
