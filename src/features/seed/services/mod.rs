mod seed_service;

pub use seed_service::SeedService;
