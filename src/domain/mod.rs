// Domain layer: catalog entities, selection value object and ports.

pub mod model;
pub mod ports;
