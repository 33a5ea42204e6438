mod seed_data;

pub use seed_data::{SeedProduct, SeedUser, SEED_PRODUCTS, SEED_USERS};
