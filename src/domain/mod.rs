// Domain layer: session value types and ports (interfaces).

pub mod model;
pub mod ports;
pub mod validation;
