pub mod batches;
pub mod dashboard;
pub mod drives;
pub mod insights;
pub mod student;
pub mod students;
pub mod verification;
