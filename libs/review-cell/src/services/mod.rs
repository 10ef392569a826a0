pub mod permissions;
pub mod review;
