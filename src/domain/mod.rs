// Domain layer: request/response models and the provider port. No HTTP server types here.

pub mod model;
pub mod ports;
