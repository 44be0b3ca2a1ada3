// Read-only views over skills, candidates and jobs.

pub mod handlers;
