pub mod programs;
pub mod status;
pub mod students;
