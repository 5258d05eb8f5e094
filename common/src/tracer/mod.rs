mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerOptions};
