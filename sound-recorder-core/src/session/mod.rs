pub mod buffer_recorder;
pub mod engine;

#[cfg(test)]
pub(crate) mod support;
