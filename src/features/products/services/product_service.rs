use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{
    CreateProductDto, ProductResponseDto, ProductUserDto, UpdateProductDto,
};
use crate::features::products::models::{
    normalize_slug, normalize_tags, Product, ProductGender, ProductImage, ProductRecord,
};
use crate::shared::types::PaginationQuery;

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.title, p.price, p.description, p.slug, p.stock, p.sizes, p.gender,
           p.tags, p.user_id, p.created_at, p.updated_at,
           u.email AS user_email, u.full_name AS user_full_name
    FROM products p
    LEFT JOIN users u ON u.id = p.user_id
"#;

const PRODUCT_COLUMNS: &str =
    "id, title, price, description, slug, stock, sizes, gender, tags, user_id, created_at, updated_at";

/// Column values written on insert and update, already normalized
struct ProductFields {
    title: String,
    price: f64,
    description: Option<String>,
    slug: String,
    stock: i32,
    sizes: Vec<String>,
    gender: ProductGender,
    tags: Vec<String>,
}

impl ProductFields {
    fn from_create(dto: CreateProductDto) -> Self {
        let slug = dto.slug.unwrap_or_else(|| dto.title.clone());
        Self {
            slug: normalize_slug(&slug),
            title: dto.title,
            price: dto.price.unwrap_or(0.0),
            description: dto.description,
            stock: dto.stock.unwrap_or(0),
            sizes: dto.sizes.unwrap_or_default(),
            gender: dto.gender,
            tags: normalize_tags(dto.tags.unwrap_or_default()),
        }
    }

    /// Merge an update over the stored row
    fn merged(existing: Product, dto: UpdateProductDto) -> Self {
        Self {
            title: dto.title.unwrap_or(existing.title),
            price: dto.price.unwrap_or(existing.price),
            description: dto.description.or(existing.description),
            slug: normalize_slug(&dto.slug.unwrap_or(existing.slug)),
            stock: dto.stock.unwrap_or(existing.stock),
            sizes: dto.sizes.unwrap_or(existing.sizes),
            gender: dto.gender.unwrap_or(existing.gender),
            tags: normalize_tags(dto.tags.unwrap_or(existing.tags)),
        }
    }
}

/// Service for the product catalog
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a product and its images in one transaction
    pub async fn create(
        &self,
        dto: CreateProductDto,
        user: ProductUserDto,
    ) -> Result<ProductResponseDto> {
        let images = dto.images.clone().unwrap_or_default();
        let fields = ProductFields::from_create(dto);

        let mut tx = self.pool.begin().await.map_err(AppError::from_db_write)?;

        let product = match Self::insert_product(&mut tx, &fields, user.id, &images).await {
            Ok(product) => product,
            Err(e) => {
                let _ = tx.rollback().await;
                return Err(AppError::from_db_write(e));
            }
        };

        tx.commit().await.map_err(AppError::from_db_write)?;

        tracing::info!("Product created: id={}, slug={}", product.id, product.slug);

        Ok(ProductResponseDto::from_record(
            ProductRecord {
                product,
                user_email: Some(user.email),
                user_full_name: Some(user.full_name),
            },
            images,
        ))
    }

    /// Page through products, returning the page and the total count
    pub async fn find_all(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ProductResponseDto>, i64)> {
        let records = sqlx::query_as::<_, ProductRecord>(&format!(
            "{} ORDER BY p.created_at, p.id LIMIT $1 OFFSET $2",
            PRODUCT_SELECT
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count products: {:?}", e);
                AppError::Database(e)
            })?;

        let products = self.attach_images(records).await?;
        Ok((products, total))
    }

    /// Find by id when `term` is a UUID, otherwise by title (case-insensitive) or slug
    pub async fn find_one(&self, term: &str) -> Result<ProductResponseDto> {
        let record = match Uuid::parse_str(term) {
            Ok(id) => self.find_record_by_id(id).await?,
            Err(_) => sqlx::query_as::<_, ProductRecord>(&format!(
                "{} WHERE UPPER(p.title) = UPPER($1) OR p.slug = LOWER($1)",
                PRODUCT_SELECT
            ))
            .bind(term)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get product by term: {:?}", e);
                AppError::Database(e)
            })?,
        };

        let record =
            record.ok_or_else(|| AppError::NotFound(format!("Product with {} not found", term)))?;

        let mut products = self.attach_images(vec![record]).await?;
        products
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Product with {} not found", term)))
    }

    /// Merge `dto` over the stored product, replacing images when given
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateProductDto,
        user: ProductUserDto,
    ) -> Result<ProductResponseDto> {
        let existing = self
            .find_record_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with id: {} not found", id)))?
            .product;

        let images = dto.images.clone();
        let fields = ProductFields::merged(existing, dto);

        let mut tx = self.pool.begin().await.map_err(AppError::from_db_write)?;

        if let Err(e) =
            Self::write_update(&mut tx, id, &fields, user.id, images.as_deref()).await
        {
            let _ = tx.rollback().await;
            return Err(match e {
                sqlx::Error::RowNotFound => {
                    AppError::NotFound(format!("Product with id: {} not found", id))
                }
                e => AppError::from_db_write(e),
            });
        }

        tx.commit().await.map_err(AppError::from_db_write)?;

        tracing::info!("Product updated: id={}", id);

        self.find_one(&id.to_string()).await
    }

    /// Delete a product; its images go with it by cascade
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_db_write)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with id: {} not found",
                id
            )));
        }

        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }

    /// Remove every image and product row
    pub async fn delete_all_products(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(AppError::from_db_write)?;

        let deleted = async {
            sqlx::query("DELETE FROM product_images")
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM products").execute(&mut *tx).await
        }
        .await;

        match deleted {
            Ok(result) => {
                tx.commit().await.map_err(AppError::from_db_write)?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                let _ = tx.rollback().await;
                Err(AppError::from_db_write(e))
            }
        }
    }

    async fn find_record_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>> {
        sqlx::query_as::<_, ProductRecord>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get product by id: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Load the images of every record in one query and flatten them to URLs
    async fn attach_images(&self, records: Vec<ProductRecord>) -> Result<Vec<ProductResponseDto>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.product.id).collect();

        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT url, product_id
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product images: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_product: HashMap<Uuid, Vec<String>> = HashMap::new();
        for image in images {
            by_product
                .entry(image.product_id)
                .or_default()
                .push(image.url);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let images = by_product.remove(&record.product.id).unwrap_or_default();
                ProductResponseDto::from_record(record, images)
            })
            .collect())
    }

    async fn insert_product(
        tx: &mut Transaction<'_, Postgres>,
        fields: &ProductFields,
        user_id: Uuid,
        images: &[String],
    ) -> std::result::Result<Product, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (title, price, description, slug, stock, sizes, gender, tags, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&fields.title)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.slug)
        .bind(fields.stock)
        .bind(&fields.sizes)
        .bind(fields.gender)
        .bind(&fields.tags)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        Self::insert_images(tx, product.id, images).await?;
        Ok(product)
    }

    async fn write_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        fields: &ProductFields,
        user_id: Uuid,
        images: Option<&[String]>,
    ) -> std::result::Result<(), sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, price = $3, description = $4, slug = $5, stock = $6,
                sizes = $7, gender = $8, tags = $9, user_id = $10, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.slug)
        .bind(fields.stock)
        .bind(&fields.sizes)
        .bind(fields.gender)
        .bind(&fields.tags)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        // Deleted between the preload and this transaction
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        if let Some(images) = images {
            sqlx::query("DELETE FROM product_images WHERE product_id = $1")
                .bind(id)
                .execute(&mut **tx)
                .await?;
            Self::insert_images(tx, id, images).await?;
        }

        Ok(())
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        images: &[String],
    ) -> std::result::Result<(), sqlx::Error> {
        if images.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO product_images (url, product_id)
            SELECT url, $2 FROM UNNEST($1::TEXT[]) WITH ORDINALITY AS t(url, ord)
            ORDER BY ord
            "#,
        )
        .bind(images)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::services::{AuthService, TokenService};
    use crate::shared::test_helpers::test_auth_config;
    use chrono::Utc;
    use std::sync::Arc;

    fn stored() -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Padded Tee".to_string(),
            price: 25.0,
            description: Some("Soft".to_string()),
            slug: "padded_tee".to_string(),
            stock: 4,
            sizes: vec!["M".to_string()],
            gender: ProductGender::Men,
            tags: vec!["shirt".to_string()],
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_fields_default_slug_from_title() {
        let dto: CreateProductDto = serde_json::from_value(serde_json::json!({
            "title": "Women's Cropped Hoodie",
            "gender": "women",
            "tags": ["Hoodie"]
        }))
        .unwrap();

        let fields = ProductFields::from_create(dto);
        assert_eq!(fields.slug, "womens_cropped_hoodie");
        assert_eq!(fields.price, 0.0);
        assert_eq!(fields.stock, 0);
        assert!(fields.sizes.is_empty());
        assert_eq!(fields.tags, vec!["hoodie"]);
    }

    #[test]
    fn test_merged_keeps_unset_fields() {
        let dto = UpdateProductDto {
            price: Some(30.0),
            slug: Some("New Slug".to_string()),
            ..Default::default()
        };

        let fields = ProductFields::merged(stored(), dto);
        assert_eq!(fields.title, "Padded Tee");
        assert_eq!(fields.price, 30.0);
        assert_eq!(fields.slug, "new_slug");
        assert_eq!(fields.stock, 4);
        assert_eq!(fields.description.as_deref(), Some("Soft"));
        assert_eq!(fields.gender, ProductGender::Men);
    }

    async fn owner(pool: &PgPool, email: &str) -> ProductUserDto {
        let auth = AuthService::new(
            pool.clone(),
            Arc::new(TokenService::new(&test_auth_config())),
        );
        let user = auth
            .insert_user(email, "not-a-real-hash", "Shop Owner", None)
            .await
            .unwrap();
        ProductUserDto::from(&user)
    }

    fn create_dto(title: &str, images: &[&str]) -> CreateProductDto {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "price": 35.0,
            "gender": "men",
            "sizes": ["S", "M"],
            "images": images,
        }))
        .unwrap()
    }

    async fn image_rows(pool: &PgPool, product_id: Uuid) -> Vec<String> {
        sqlx::query_scalar("SELECT url FROM product_images WHERE product_id = $1 ORDER BY id")
            .bind(product_id)
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_one_by_id_title_or_slug(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        let created = service
            .create(create_dto("Men's Chill Crew Neck", &["a.jpg", "b.jpg"]), user)
            .await
            .unwrap();
        assert_eq!(created.slug, "mens_chill_crew_neck");
        assert_eq!(created.images, vec!["a.jpg", "b.jpg"]);

        for term in [
            created.id.to_string(),
            "MEN'S CHILL CREW NECK".to_string(),
            "men's chill crew neck".to_string(),
            "Mens_Chill_Crew_Neck".to_string(),
        ] {
            let found = service.find_one(&term).await.unwrap();
            assert_eq!(found.id, created.id, "term {}", term);
            assert_eq!(found.images, vec!["a.jpg", "b.jpg"]);
            assert_eq!(
                found.user.as_ref().map(|u| u.email.as_str()),
                Some("owner@example.com")
            );
        }

        match service.find_one("no_such_product").await {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, "Product with no_such_product not found")
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }
        assert!(matches!(
            service.find_one(&Uuid::new_v4().to_string()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_all_pages_with_total(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        for title in ["First Tee", "Second Tee", "Third Tee"] {
            service
                .create(create_dto(title, &[]), user.clone())
                .await
                .unwrap();
        }

        let first = PaginationQuery {
            limit: 2,
            offset: 0,
        };
        let (page, total) = service.find_all(&first).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "First Tee");

        let rest = PaginationQuery {
            limit: 2,
            offset: 2,
        };
        let (page, total) = service.find_all(&rest).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Third Tee");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_replaces_images_in_order(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let creator = owner(&pool, "creator@example.com").await;
        let editor = owner(&pool, "editor@example.com").await;

        let created = service
            .create(create_dto("Padded Tee", &["old.jpg"]), creator)
            .await
            .unwrap();

        let dto = UpdateProductDto {
            price: Some(40.0),
            images: Some(vec![
                "c.jpg".to_string(),
                "a.jpg".to_string(),
                "b.jpg".to_string(),
            ]),
            ..Default::default()
        };
        let updated = service.update(created.id, dto, editor).await.unwrap();

        assert_eq!(updated.price, 40.0);
        assert_eq!(updated.title, "Padded Tee");
        assert_eq!(updated.images, vec!["c.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(
            updated.user.map(|u| u.email),
            Some("editor@example.com".to_string())
        );
        assert_eq!(
            image_rows(&pool, created.id).await,
            vec!["c.jpg", "a.jpg", "b.jpg"]
        );

        // Without `images` the stored set is left alone
        let dto = UpdateProductDto {
            stock: Some(9),
            ..Default::default()
        };
        let user = owner(&pool, "third@example.com").await;
        let updated = service.update(created.id, dto, user).await.unwrap();
        assert_eq!(updated.stock, 9);
        assert_eq!(updated.images, vec!["c.jpg", "a.jpg", "b.jpg"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_update_keeps_previous_images(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        service
            .create(create_dto("Taken Title", &[]), user.clone())
            .await
            .unwrap();
        let other = service
            .create(create_dto("Other Title", &["keep.jpg"]), user.clone())
            .await
            .unwrap();

        let dto = UpdateProductDto {
            title: Some("Taken Title".to_string()),
            images: Some(vec!["new.jpg".to_string()]),
            ..Default::default()
        };
        match service.update(other.id, dto, user).await {
            Err(AppError::BadRequest(detail)) => {
                assert!(detail.contains("(title)=(Taken Title)"), "{}", detail)
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }

        assert_eq!(image_rows(&pool, other.id).await, vec!["keep.jpg"]);
        let unchanged = service.find_one(&other.id.to_string()).await.unwrap();
        assert_eq!(unchanged.title, "Other Title");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_slug_is_bad_request(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        service
            .create(create_dto("Kids Tee", &[]), user.clone())
            .await
            .unwrap();

        let mut dto = create_dto("Kid's Tee", &[]);
        dto.slug = Some("KIDS TEE".to_string());
        match service.create(dto, user).await {
            Err(AppError::BadRequest(detail)) => {
                assert!(detail.contains("(slug)=(kids_tee)"), "{}", detail)
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_missing_product_is_not_found(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;
        let id = Uuid::new_v4();

        let dto = UpdateProductDto {
            images: Some(vec!["x.jpg".to_string()]),
            ..Default::default()
        };
        match service.update(id, dto, user.clone()).await {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, format!("Product with id: {} not found", id))
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.id)),
        }

        // Row gone by the time the transaction runs
        let fields = ProductFields::from_create(create_dto("Ghost Tee", &[]));
        let mut tx = pool.begin().await.unwrap();
        let images = vec!["x.jpg".to_string()];
        let result = ProductService::write_update(
            &mut tx,
            id,
            &fields,
            user.id,
            Some(images.as_slice()),
        )
        .await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        tx.rollback().await.unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_remove_cascades_images(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        let created = service
            .create(create_dto("Short Lived Tee", &["a.jpg"]), user)
            .await
            .unwrap();

        service.remove(created.id).await.unwrap();
        assert!(image_rows(&pool, created.id).await.is_empty());

        match service.remove(created.id).await {
            Err(AppError::NotFound(msg)) => {
                assert_eq!(msg, format!("Product with id: {} not found", created.id))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_all_products(pool: PgPool) {
        let service = ProductService::new(pool.clone());
        let user = owner(&pool, "owner@example.com").await;

        for title in ["One", "Two"] {
            service
                .create(create_dto(title, &["img.png"]), user.clone())
                .await
                .unwrap();
        }

        assert_eq!(service.delete_all_products().await.unwrap(), 2);
        let (page, total) = service.find_all(&PaginationQuery::default()).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 0);
    }
}
