use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Hosted product image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub public_id: String,
    pub url: String,
}

/// Customer review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer's user id
    pub user: String,
    pub name: String,
    pub rating: f64,
    pub comment: String,
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// UUID v7 string, stored as `_id`
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub category: String,
    pub seller: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub num_of_reviews: i32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Id of the user who created the product
    #[serde(default)]
    pub user: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of the create and update endpoints
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(length(min = 1, message = "Please enter product description"))]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[validate(length(min = 1, message = "Please enter product category"))]
    pub category: String,
    #[validate(length(min = 1, message = "Please enter seller"))]
    pub seller: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[serde(default, alias = "numOfReviews")]
    #[validate(range(min = 0))]
    pub num_of_reviews: i32,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// One page of the catalog
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    /// Products on this page
    pub count: usize,
    /// Products in the whole collection
    pub product_count: u64,
    pub products: Vec<Product>,
}

impl Product {
    /// New product created by `user`.
    pub fn new(input: ProductInput, user: Option<String>) -> Self {
        Self::from_input(Uuid::now_v7().to_string(), input, user, Utc::now())
    }

    /// Replacement for the product stored under `id`.
    ///
    /// Creator and creation time survive; a missing product is created.
    pub fn replacing(id: String, input: ProductInput, existing: Option<&Product>) -> Self {
        let (user, created_at) = match existing {
            Some(product) => (product.user.clone(), product.created_at),
            None => (None, Utc::now()),
        };
        Self::from_input(id, input, user, created_at)
    }

    fn from_input(
        id: String,
        input: ProductInput,
        user: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: input.name.trim().to_string(),
            price: input.price,
            description: input.description.trim().to_string(),
            rating: input.rating,
            images: input.images,
            category: input.category.trim().to_string(),
            seller: input.seller.trim().to_string(),
            stock: input.stock,
            num_of_reviews: input.num_of_reviews,
            reviews: input.reviews,
            user,
            created_at,
        }
    }
}
