//! Static catalog loaded by the seed endpoint.

use crate::features::products::dtos::CreateProductDto;
use crate::features::products::models::ProductGender;
use crate::shared::constants::{ROLE_ADMIN, ROLE_USER};

pub struct SeedUser {
    pub email: &'static str,
    pub full_name: &'static str,
    pub password: &'static str,
    pub roles: &'static [&'static str],
}

pub struct SeedProduct {
    pub title: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub stock: i32,
    pub sizes: &'static [&'static str],
    pub slug: &'static str,
    pub tags: &'static [&'static str],
    pub gender: ProductGender,
    pub images: &'static [&'static str],
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl From<&SeedProduct> for CreateProductDto {
    fn from(p: &SeedProduct) -> Self {
        Self {
            title: p.title.to_string(),
            price: Some(p.price),
            description: Some(p.description.to_string()),
            slug: Some(p.slug.to_string()),
            stock: Some(p.stock),
            sizes: Some(owned(p.sizes)),
            gender: p.gender,
            tags: Some(owned(p.tags)),
            images: Some(owned(p.images)),
        }
    }
}

/// The first user owns every seeded product.
pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        email: "test1@google.com",
        full_name: "Test One",
        password: "Abc123",
        roles: &[ROLE_ADMIN],
    },
    SeedUser {
        email: "test2@google.com",
        full_name: "Test Two",
        password: "Abc123",
        roles: &[ROLE_USER],
    },
];

pub const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Men's Chill Crew Neck Sweatshirt",
        description: "Introducing the Tesla Chill Collection. The Men's Chill Crew Neck Sweatshirt has a premium, heavyweight exterior and soft fleece interior for comfort in any season.",
        price: 75.0,
        stock: 7,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        slug: "mens_chill_crew_neck_sweatshirt",
        tags: &["sweatshirt"],
        gender: ProductGender::Men,
        images: &["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Quilted Shirt Jacket",
        description: "The Men's Quilted Shirt Jacket features a uniquely fit, quilted design for warmth and mobility in cold weather seasons. With an overall street-smart aesthetic.",
        price: 200.0,
        stock: 5,
        sizes: &["XS", "S", "M", "XL", "XXL"],
        slug: "men_quilted_shirt_jacket",
        tags: &["jacket"],
        gender: ProductGender::Men,
        images: &["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Raven Lightweight Zip Up Bomber Jacket",
        description: "Introducing the Tesla Raven Collection. The Men's Raven Lightweight Zip Up Bomber has a premium, modern silhouette made from a sustainable bamboo cotton blend for versatility in any season.",
        price: 130.0,
        stock: 10,
        sizes: &["S", "M", "L", "XL", "XXL"],
        slug: "men_raven_lightweight_zip_up_bomber_jacket",
        tags: &["shirt"],
        gender: ProductGender::Men,
        images: &["1740250-00-A_0_2000.jpg", "1740250-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Turbine Long Sleeve Tee",
        description: "Introducing the Tesla Turbine Collection. Designed for style, comfort and everyday lifestyle, the Men's Turbine Long Sleeve Tee features a subtle, water-based T logo on the left chest.",
        price: 45.0,
        stock: 50,
        sizes: &["XS", "S", "M", "L"],
        slug: "men_turbine_long_sleeve_tee",
        tags: &["shirt"],
        gender: ProductGender::Men,
        images: &["1740280-00-A_0_2000.jpg", "1740280-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Cybertruck Owl Tee",
        description: "Inspired by our fully integrated home solar and storage system, the Tesla Solar Roof Tee advocates for clean, sustainable energy wherever you go.",
        price: 35.0,
        stock: 0,
        sizes: &["M", "L", "XL", "XXL"],
        slug: "men_cybertruck_owl_tee",
        tags: &["shirt"],
        gender: ProductGender::Men,
        images: &["7654393-00-A_2_2000.jpg", "7654393-00-A_3.jpg"],
    },
    SeedProduct {
        title: "Women's Cropped Puffer Jacket",
        description: "The Women's Cropped Puffer Jacket features a uniquely cropped silhouette for the perfect, modern style while on the go during the cozy season ahead.",
        price: 225.0,
        stock: 85,
        sizes: &["XS", "S", "M"],
        slug: "women_cropped_puffer_jacket",
        tags: &["hoodie"],
        gender: ProductGender::Women,
        images: &["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Chill Half Zip Cropped Hoodie",
        description: "Introducing the Tesla Chill Collection. The Women's Chill Half Zip Cropped Hoodie has a premium, soft fleece exterior and cropped silhouette for comfort in everyday lifestyle.",
        price: 130.0,
        stock: 10,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        slug: "women_chill_half_zip_cropped_hoodie",
        tags: &["hoodie"],
        gender: ProductGender::Women,
        images: &["1740226-00-A_0_2000.jpg", "1740226-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Raven Slouchy Crew Sweatshirt",
        description: "Introducing the Tesla Raven Collection. The Women's Raven Slouchy Crew Sweatshirt has a premium, relaxed silhouette made from a sustainable bamboo cotton blend.",
        price: 110.0,
        stock: 9,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        slug: "women_raven_slouchy_crew_sweatshirt",
        tags: &["hoodie"],
        gender: ProductGender::Women,
        images: &["1740260-00-A_0_2000.jpg", "1740260-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Kids Cybertruck Long Sleeve Tee",
        description: "Designed for fit, comfort and style, the Kids Cybertruck Graffiti Long Sleeve Tee features a water-based Cybertruck graffiti wordmark across the chest.",
        price: 30.0,
        stock: 10,
        sizes: &["XS", "S", "M"],
        slug: "kids_cybertruck_long_sleeve_tee",
        tags: &["shirt"],
        gender: ProductGender::Kid,
        images: &["1742693-00-A_0_2000.jpg", "1742693-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Kids Scribble T Logo Tee",
        description: "The Kids Scribble T Logo Tee is made from 100% Peruvian cotton and features a Tesla T sketched logo for every young artist to wear.",
        price: 25.0,
        stock: 0,
        sizes: &["XS", "S", "M"],
        slug: "kids_scribble_t_logo_tee",
        tags: &["shirt"],
        gender: ProductGender::Kid,
        images: &["8529312-00-A_0_2000.jpg", "8529312-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Tesla Baseball Cap",
        description: "The Tesla Baseball Cap is made from a premium cotton twill and features an adjustable strap in the back.",
        price: 30.0,
        stock: 20,
        sizes: &["M"],
        slug: "tesla_baseball_cap",
        tags: &["hat"],
        gender: ProductGender::Unisex,
        images: &["1657932-00-A_0_2000.jpg", "1657932-00-A_1.jpg"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::models::normalize_slug;
    use crate::shared::validation::validate_password_strength;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_first_seed_user_is_admin() {
        assert!(SEED_USERS[0].roles.contains(&ROLE_ADMIN));
        for user in SEED_USERS {
            assert!(validate_password_strength(user.password).is_ok());
        }
    }

    #[test]
    fn test_products_are_unique_and_valid() {
        let titles: HashSet<_> = SEED_PRODUCTS.iter().map(|p| p.title.to_uppercase()).collect();
        let slugs: HashSet<_> = SEED_PRODUCTS.iter().map(|p| normalize_slug(p.slug)).collect();
        assert_eq!(titles.len(), SEED_PRODUCTS.len());
        assert_eq!(slugs.len(), SEED_PRODUCTS.len());

        for product in SEED_PRODUCTS {
            assert_eq!(normalize_slug(product.slug), product.slug);
            assert!(CreateProductDto::from(product).validate().is_ok());
        }
    }
}
