pub mod job_dto;
pub mod job_handlers;
pub mod job_models;
pub mod job_repository;

pub use job_handlers::{create_job, get_job, get_jobs};
pub use job_models::Job;
pub use job_repository::JobRepository;
