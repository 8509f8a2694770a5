mod errors;
mod fee_engine;
#[cfg(test)]
mod tests;

pub use errors::EngineError;
pub use fee_engine::FeeEngine;
