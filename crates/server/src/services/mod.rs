pub mod applications;
pub mod jobs;
pub mod profiles;
pub mod review;
pub mod storage;
pub mod wizard;
pub mod workflow;
