// Domain layer: core models and ports. Concrete file system and process
// implementations live under adapters.

pub mod model;
pub mod ports;
