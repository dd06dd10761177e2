//! Catalog seeding from a JSON fixture.

use domain_products::{ProductInput, ProductRepository, ProductService};
use eyre::WrapErr;
use std::path::Path;
use tracing::info;

/// Products listed in a fixture: a JSON array of product inputs.
pub fn parse_fixture(raw: &str) -> eyre::Result<Vec<ProductInput>> {
    serde_json::from_str(raw).wrap_err("Product fixture must be a JSON array of products")
}

/// Replace the catalog with the products in `path`; returns how many were inserted.
pub async fn seed_from_file<R: ProductRepository>(
    path: &Path,
    service: &ProductService<R>,
) -> eyre::Result<u64> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read product fixture {}", path.display()))?;
    let products = parse_fixture(&raw)?;

    info!("Products are deleted");
    let inserted = service.seed_products(products).await?;
    info!(inserted, "All products are added");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_products::InMemoryProductRepository;

    const FIXTURE: &str = r#"[
        {
            "name": "USB Cable",
            "price": 9.5,
            "description": "Braided cable",
            "category": "Accessories",
            "seller": "Amazon",
            "stock": 40,
            "numOfReviews": 2,
            "images": [{ "public_id": "cable", "url": "/images/cable.jpg" }]
        },
        {
            "name": "Monitor",
            "price": 199.0,
            "description": "27 inch display",
            "category": "Electronics",
            "seller": "Ebay"
        }
    ]"#;

    #[test]
    fn test_parse_fixture() {
        let products = parse_fixture(FIXTURE).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].num_of_reviews, 2);
        assert_eq!(products[0].images[0].public_id, "cable");
        assert_eq!(products[1].stock, 0);
    }

    #[test]
    fn test_parse_fixture_rejects_object() {
        let err = parse_fixture(r#"{ "name": "Monitor" }"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[tokio::test]
    async fn test_seed_from_file_replaces_catalog() {
        let path = std::env::temp_dir().join(format!("shop-seed-{}.json", std::process::id()));
        tokio::fs::write(&path, FIXTURE).await.unwrap();

        let service = ProductService::new(InMemoryProductRepository::new());
        assert_eq!(seed_from_file(&path, &service).await.unwrap(), 2);
        assert_eq!(seed_from_file(&path, &service).await.unwrap(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_from_missing_file() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let err = seed_from_file(Path::new("/nonexistent/products.json"), &service)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read product fixture"));
    }
}
