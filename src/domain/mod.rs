// Domain layer: the values that flow through a conversion and the ports the
// job runner talks to.

pub mod model;
pub mod ports;
