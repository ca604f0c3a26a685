pub mod applications;
pub mod auth;
pub mod employer;
pub mod favourites;
pub mod jobs;
pub mod profile;
