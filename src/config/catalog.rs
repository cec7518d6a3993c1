use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{BillingError, Result};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Subcategory {
    pub name: String,
    /// Id of the owning category.
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Product {
    pub description: String,
    /// HSN tax classification code.
    pub hsn: String,
    /// Id of the owning subcategory.
    pub subcategory: String,
}

/// Product catalog loaded from catalog.toml.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Catalog {
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
    #[serde(default)]
    pub subcategories: BTreeMap<String, Subcategory>,
    #[serde(default)]
    pub products: BTreeMap<String, Product>,
}

/// A new entry was saved but resembles existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The subcategory name is already used under these other categories.
    SubcategoryElsewhere {
        name: String,
        categories: Vec<String>,
    },
    /// The description is already used by these products with a different
    /// subcategory or HSN code.
    ProductVariant {
        description: String,
        products: Vec<String>,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::SubcategoryElsewhere { name, categories } => write!(
                f,
                "Subcategory '{name}' also exists under category {}",
                quoted(categories)
            ),
            CatalogWarning::ProductVariant {
                description,
                products,
            } => write!(
                f,
                "Product '{description}' also exists with another subcategory or HSN code as {}",
                quoted(products)
            ),
        }
    }
}

fn quoted(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Names compare trimmed and case-insensitively.
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BillingError::EmptyCatalogField(field));
    }
    Ok(value.to_string())
}

/// Catalog id derived from a display name: `"LED Bulbs"` → `led-bulbs`.
pub fn default_id(name: &str) -> String {
    slug::slugify(name)
}

impl Catalog {
    /// Check that every subcategory and product points at an existing parent.
    pub fn validate(&self) -> Result<()> {
        for (id, sub) in &self.subcategories {
            if !self.categories.contains_key(&sub.category) {
                return Err(BillingError::CatalogIntegrity {
                    entry: id.clone(),
                    kind: "category",
                    target: sub.category.clone(),
                });
            }
        }

        for (id, product) in &self.products {
            if !self.subcategories.contains_key(&product.subcategory) {
                return Err(BillingError::CatalogIntegrity {
                    entry: id.clone(),
                    kind: "subcategory",
                    target: product.subcategory.clone(),
                });
            }
        }
        Ok(())
    }

    /// Add a category. A category with the same name is a duplicate.
    pub fn add_category(&mut self, id: &str, name: &str) -> Result<()> {
        let id = required(id, "id")?;
        let name = required(name, "category name")?;

        if self.categories.values().any(|c| same_name(&c.name, &name)) {
            return Err(BillingError::DuplicateCategory(name));
        }
        if self.categories.contains_key(&id) {
            return Err(BillingError::CatalogIdTaken { kind: "category", id });
        }

        self.categories.insert(id, Category { name });
        Ok(())
    }

    /// Add a subcategory under an existing category. The same name under
    /// the same category is a duplicate; under other categories it is
    /// saved with a warning.
    pub fn add_subcategory(
        &mut self,
        id: &str,
        name: &str,
        category: &str,
    ) -> Result<Option<CatalogWarning>> {
        let id = required(id, "id")?;
        let name = required(name, "subcategory name")?;
        if !self.categories.contains_key(category) {
            return Err(BillingError::CategoryNotFound(category.to_string()));
        }

        let namesakes: Vec<&Subcategory> = self
            .subcategories
            .values()
            .filter(|s| same_name(&s.name, &name))
            .collect();
        if namesakes.iter().any(|s| s.category == category) {
            return Err(BillingError::DuplicateSubcategory {
                name,
                category: category.to_string(),
            });
        }
        if self.subcategories.contains_key(&id) {
            return Err(BillingError::CatalogIdTaken {
                kind: "subcategory",
                id,
            });
        }

        let mut elsewhere: Vec<String> = namesakes.iter().map(|s| s.category.clone()).collect();
        elsewhere.sort();
        elsewhere.dedup();
        let warning = (!elsewhere.is_empty()).then(|| CatalogWarning::SubcategoryElsewhere {
            name: name.clone(),
            categories: elsewhere,
        });

        self.subcategories.insert(
            id,
            Subcategory {
                name,
                category: category.to_string(),
            },
        );
        Ok(warning)
    }

    /// Add a product under an existing subcategory. The same description
    /// with the same subcategory and HSN code is a duplicate; any other
    /// product sharing the description produces a warning.
    pub fn add_product(
        &mut self,
        id: &str,
        description: &str,
        hsn: &str,
        subcategory: &str,
    ) -> Result<Option<CatalogWarning>> {
        let id = required(id, "id")?;
        let description = required(description, "product description")?;
        let hsn = required(hsn, "HSN code")?;
        if !self.subcategories.contains_key(subcategory) {
            return Err(BillingError::SubcategoryNotFound(subcategory.to_string()));
        }

        let namesakes: Vec<(&String, &Product)> = self
            .products
            .iter()
            .filter(|(_, p)| same_name(&p.description, &description))
            .collect();
        if namesakes
            .iter()
            .any(|(_, p)| p.subcategory == subcategory && p.hsn.trim() == hsn)
        {
            return Err(BillingError::DuplicateProduct(description));
        }
        if self.products.contains_key(&id) {
            return Err(BillingError::CatalogIdTaken { kind: "product", id });
        }

        let warning = (!namesakes.is_empty()).then(|| CatalogWarning::ProductVariant {
            description: description.clone(),
            products: namesakes.iter().map(|(id, _)| id.to_string()).collect(),
        });

        self.products.insert(
            id,
            Product {
                description,
                hsn,
                subcategory: subcategory.to_string(),
            },
        );
        Ok(warning)
    }

    pub fn product(&self, id: &str) -> Result<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| BillingError::ProductNotFound(id.to_string()))
    }

    /// Category id a product belongs to.
    pub fn category_of(&self, product: &Product) -> Option<&str> {
        self.subcategories
            .get(&product.subcategory)
            .map(|sub| sub.category.as_str())
    }

    /// Products sorted by id, optionally narrowed to a category and/or
    /// subcategory. Unknown filter ids are errors rather than empty results.
    pub fn filter_products(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
    ) -> Result<Vec<(&str, &Product)>> {
        if let Some(id) = category {
            if !self.categories.contains_key(id) {
                return Err(BillingError::CategoryNotFound(id.to_string()));
            }
        }
        if let Some(id) = subcategory {
            if !self.subcategories.contains_key(id) {
                return Err(BillingError::SubcategoryNotFound(id.to_string()));
            }
        }

        Ok(self
            .products
            .iter()
            .filter(|(_, p)| subcategory.map_or(true, |s| p.subcategory == s))
            .filter(|(_, p)| category.map_or(true, |c| self.category_of(p) == Some(c)))
            .map(|(id, p)| (id.as_str(), p))
            .collect())
    }
}
