pub mod job;
pub mod user;

pub use job::{Job, JobNew, JobUpdate};
pub use user::{User, UserNew, UserUpdate};
