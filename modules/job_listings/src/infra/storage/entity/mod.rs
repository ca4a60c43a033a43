pub mod applications;
pub mod jobs;
pub mod offers;
pub mod transactions;
