pub mod control_worker;
pub mod lanes;
