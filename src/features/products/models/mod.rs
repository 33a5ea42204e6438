mod product;
mod product_image;

pub use product::{normalize_slug, normalize_tags, Product, ProductGender, ProductRecord};
pub use product_image::ProductImage;
