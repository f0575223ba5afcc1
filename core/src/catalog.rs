// storefront/src/catalog.rs

//! Read-side product browsing and the seed catalog generator.

use crate::backend::{DataAccess, ProductQuery};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Money, NewProduct, Product, ProductId};
use std::sync::Arc;

/// Products of one category, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
  pub category: String,
  pub products: Vec<Product>,
}

#[derive(Clone)]
pub struct Catalog {
  data: Arc<dyn DataAccess>,
}

impl Catalog {
  pub fn new(data: Arc<dyn DataAccess>) -> Self {
    Self { data }
  }

  /// The listing page: every product grouped by category, categories in
  /// first-seen catalog order.
  pub async fn by_category(&self) -> StoreResult<Vec<CategoryGroup>> {
    let mut products = self.data.query_products(&ProductQuery::all()).await?;
    products.sort_by_key(|product| product.id);

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for product in products {
      match groups.iter().position(|group| group.category == product.category) {
        Some(idx) => groups[idx].products.push(product),
        None => groups.push(CategoryGroup {
          category: product.category.clone(),
          products: vec![product],
        }),
      }
    }
    Ok(groups)
  }

  /// The detail page.
  pub async fn product(&self, id: ProductId) -> StoreResult<Product> {
    self
      .data
      .get_product(id)
      .await?
      .ok_or_else(|| StoreError::NotFound("Product not found".to_string()))
  }

  pub async fn search(&self, query: &ProductQuery) -> StoreResult<Vec<Product>> {
    self.data.query_products(query).await
  }
}

struct SeedCategory {
  name: &'static str,
  images: [&'static str; 4],
  specs: [[&'static str; 4]; 4],
  titles: [&'static str; 8],
}

const SEED_CATEGORIES: [SeedCategory; 3] = [
  SeedCategory {
    name: "Desktops",
    images: ["desktop1.jpg", "desktop2.jpg", "desktop3.jpg", "desktop4.jpg"],
    specs: [
      ["Intel Core i5", "8GB RAM", "1TB HDD", "Windows 11 Home"],
      ["Intel Core i7", "16GB RAM", "512GB SSD", "Windows 11 Pro"],
      ["AMD Ryzen 5", "12GB RAM", "1TB HDD", "Windows 10"],
      ["Intel Core i3", "8GB RAM", "256GB SSD", "Windows 11 Home"],
    ],
    titles: [
      "Dell Inspiron Desktop",
      "HP Pavilion Desktop",
      "Acer Aspire TC",
      "Lenovo IdeaCentre",
      "MSI Pro DP21",
      "ASUS ExpertCenter",
      "Apple iMac",
      "CyberPowerPC Gamer Xtreme",
    ],
  },
  SeedCategory {
    name: "Laptops",
    images: ["laptop1.jpg", "laptop2.jpg", "laptop3.jpg", "laptop4.jpg"],
    specs: [
      ["Apple M2 Chip", "8GB RAM", "256GB SSD", "macOS Sonoma"],
      ["Intel Core i5", "16GB RAM", "512GB SSD", "Windows 11 Pro"],
      ["Intel Core i7", "16GB RAM", "1TB SSD", "Windows 11 Home"],
      ["Intel Core i7", "16GB RAM", "512GB SSD", "Windows 11 Pro"],
    ],
    titles: [
      "Apple MacBook Air",
      "Lenovo ThinkPad",
      "HP Envy x360",
      "Dell XPS 13",
      "Acer Swift 3",
      "ASUS ZenBook",
      "Microsoft Surface Laptop",
      "Razer Blade Stealth",
    ],
  },
  SeedCategory {
    name: "Mobiles",
    images: ["mobile1.jpg", "mobile2.jpg", "mobile3.jpg", "mobile4.jpg"],
    specs: [
      ["6.1-inch OLED", "A16 Bionic Chip", "128GB Storage", "iOS 17"],
      ["6.2-inch AMOLED", "Exynos 2400", "256GB Storage", "Android 14"],
      ["6.7-inch AMOLED", "Snapdragon 8 Gen 2", "256GB Storage", "Android 14"],
      ["6.3-inch OLED", "Google Tensor G3", "128GB Storage", "Android 14"],
    ],
    titles: [
      "iPhone 15",
      "Samsung Galaxy S24",
      "OnePlus 12",
      "Google Pixel 8",
      "Xiaomi 13 Pro",
      "Oppo Find X6",
      "Vivo X90",
      "Sony Xperia 1 V",
    ],
  },
];

const SEED_STOCK: u32 = 25;
const PRICE_SPAN: i64 = 1101;

/// Builds the seed catalog: `per_category` products for each of Desktops,
/// Laptops and Mobiles, cycling names, images and spec lists. Prices fall in
/// 400.99..=1500.99 and are the same on every call.
pub fn generate_products(per_category: usize) -> Vec<NewProduct> {
  let mut products = Vec::with_capacity(per_category * SEED_CATEGORIES.len());
  for (cat_idx, category) in SEED_CATEGORIES.iter().enumerate() {
    for i in 0..per_category {
      let title = category.titles[i % category.titles.len()];
      let specs = category.specs[i % category.specs.len()];
      let seed = (cat_idx * per_category + i) as i64;
      let major = 400 + (seed * 389 + 211) % PRICE_SPAN;
      products.push(NewProduct {
        title: title.to_string(),
        description: Some(format!("{} with {}.", title, specs.join(", "))),
        price: Money::from_minor(major * 100 + 99),
        category: category.name.to_string(),
        image: format!("/images/{}", category.images[i % category.images.len()]),
        specs: specs.iter().map(|spec| spec.to_string()).collect(),
        stock: SEED_STOCK,
      });
    }
  }
  products
}
