//! Catalog endpoints.

use crate::wire::{money, optional_money, Document};
use crate::StoreApi;
use serde::{Deserialize, Serialize};
use store_commerce::catalog::{Product, Variant};
use store_commerce::{Currency, Money, ProductId, RawPrice, VariantId};
use store_data::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantDto {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: Option<RawPrice>,
}

impl VariantDto {
    pub(crate) fn into_variant(self, currency: Currency) -> Result<Variant, ApiError> {
        Ok(Variant {
            id: self.id.map(VariantId::new),
            size: self.size,
            color: self.color,
            stock: self.stock.max(0),
            price: optional_money(self.price.as_ref(), currency)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: RawPrice,
    #[serde(default)]
    pub count_in_stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub variants: Vec<VariantDto>,
}

impl Document for ProductDto {
    fn doc_id(&self) -> &str {
        &self.id
    }
}

impl ProductDto {
    pub(crate) fn into_product(self, currency: Currency) -> Result<Product, ApiError> {
        let mut images = self.images;
        if let Some(image) = self.image.filter(|i| !images.contains(i)) {
            images.insert(0, image);
        }

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            brand: self.brand.filter(|b| !b.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            price: money(&self.price, currency)?,
            count_in_stock: self.count_in_stock.max(0),
            images,
            rating: self.rating,
            num_reviews: self.num_reviews,
            variants: self
                .variants
                .into_iter()
                .map(|v| v.into_variant(currency))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductListDto {
    Paged {
        products: Vec<ProductDto>,
        #[serde(default = "first_page")]
        page: u32,
        #[serde(default = "first_page")]
        pages: u32,
    },
    Bare(Vec<ProductDto>),
}

fn first_page() -> u32 {
    1
}

/// Filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
}

impl ProductQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keyword) = self.keyword.as_ref().filter(|k| !k.trim().is_empty()) {
            pairs.push(("keyword", keyword.trim().to_string()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("category", category.trim().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: u32,
    pub pages: u32,
}

impl ProductPage {
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// Product fields written by admins.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: Money,
    pub count_in_stock: i64,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: product.price,
            count_in_stock: product.count_in_stock,
            images: product.images.clone(),
            variants: product.variants.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantBody<'a> {
    size: &'a str,
    color: &'a str,
    stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    price: f64,
    count_in_stock: i64,
    images: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    variants: Vec<VariantBody<'a>>,
}

impl<'a> From<&'a ProductInput> for ProductBody<'a> {
    fn from(input: &'a ProductInput) -> Self {
        Self {
            name: &input.name,
            description: &input.description,
            brand: input.brand.as_deref(),
            category: input.category.as_deref(),
            price: input.price.to_f64(),
            count_in_stock: input.count_in_stock,
            images: &input.images,
            image: input.images.first().map(String::as_str),
            variants: input
                .variants
                .iter()
                .map(|v| VariantBody {
                    size: &v.size,
                    color: &v.color,
                    stock: v.stock,
                    price: v.price.map(|p| p.to_f64()),
                })
                .collect(),
        }
    }
}

/// `/products` endpoints.
pub struct ProductsApi<'a> {
    pub(crate) api: &'a StoreApi,
}

impl ProductsApi<'_> {
    pub async fn list(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let client = self.api.client();
        let request = client.get("/products").query(query.pairs())?;
        let dto: ProductListDto = client.execute(request).await?;

        let (products, page, pages) = match dto {
            ProductListDto::Paged {
                products,
                page,
                pages,
            } => (products, page, pages),
            ProductListDto::Bare(products) => (products, 1, 1),
        };

        Ok(ProductPage {
            products: self.convert_all(products)?,
            page,
            pages: pages.max(page),
        })
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let client = self.api.client();
        let dto: ProductDto = client.execute(client.get(&format!("/products/{id}"))).await?;
        dto.into_product(self.api.currency())
    }

    /// Top-rated products.
    pub async fn top(&self) -> Result<Vec<Product>, ApiError> {
        let client = self.api.client();
        let dtos: Vec<ProductDto> = client.execute(client.get("/products/top")).await?;
        self.convert_all(dtos)
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let client = self.api.client();
        let request = client.post("/products").json(&ProductBody::from(input))?;
        let dto: ProductDto = client.execute(request).await?;
        dto.into_product(self.api.currency())
    }

    pub async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<Product, ApiError> {
        let client = self.api.client();
        let request = client
            .put(&format!("/products/{id}"))
            .json(&ProductBody::from(input))?;
        let dto: ProductDto = client.execute(request).await?;
        dto.into_product(self.api.currency())
    }

    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let client = self.api.client();
        client.execute_unit(client.delete(&format!("/products/{id}"))).await
    }

    fn convert_all(&self, dtos: Vec<ProductDto>) -> Result<Vec<Product>, ApiError> {
        let currency = self.api.currency();
        dtos.into_iter().map(|p| p.into_product(currency)).collect()
    }
}
