pub mod sample_convert;
pub mod sample_ring;
pub mod wav;
