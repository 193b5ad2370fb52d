pub mod close_sample;
pub mod indicator_row;
