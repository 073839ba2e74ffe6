// Domain layer: roster models and the ports the notifier talks through.

pub mod model;
pub mod ports;
