mod common;
mod compliance;
mod engine;
