// Adapters layer: concrete implementations for the relay, the console and machine-readable output.

pub mod console;
pub mod json;
pub mod smtp;
