//! Static product catalog.
//!
//! The catalog is read once at startup from a JSON document and never
//! mutated afterwards. Products are grouped by [`Category`] and keep the
//! order in which they appear in the document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Catalog document bundled with the crate.
const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not valid catalog JSON.
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share the same name.
    #[error("duplicate product name in catalog: {0}")]
    DuplicateName(String),

    /// Two products share the same ID.
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Cakes,
    Brownies,
    Sundaes,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 3] = [Self::Cakes, Self::Brownies, Self::Sundaes];

    /// Category name as shown on the menu.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cakes => "Cakes",
            Self::Brownies => "Brownies",
            Self::Sundaes => "Sundaes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    /// Unique within the catalog; carts key their lines on it.
    pub name: String,
    /// Image reference, resolved by whatever renders the product.
    pub image: String,
    pub price: Price,
    pub description: String,
    pub category: Category,
}

/// Products of one category, in document order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<Product>,
}

/// Read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<CategoryGroup>,
}

// Mirrors of the JSON document shape.
#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<GroupDocument>,
}

#[derive(Deserialize)]
struct GroupDocument {
    category: Category,
    items: Vec<ItemDocument>,
}

#[derive(Deserialize)]
struct ItemDocument {
    id: ProductId,
    name: String,
    image: String,
    price: Price,
    #[serde(default)]
    description: String,
}

impl Catalog {
    /// Load the catalog bundled with this crate.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the bundled document is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateName`] / [`CatalogError::DuplicateId`]
    /// when product names or IDs are not unique.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        let mut groups: Vec<CategoryGroup> = Vec::new();

        for group in document.products {
            let mut items = Vec::with_capacity(group.items.len());
            for item in group.items {
                if !names.insert(item.name.clone()) {
                    return Err(CatalogError::DuplicateName(item.name));
                }
                if !ids.insert(item.id) {
                    return Err(CatalogError::DuplicateId(item.id));
                }
                items.push(Product {
                    id: item.id,
                    name: item.name,
                    image: item.image,
                    price: item.price,
                    description: item.description,
                    category: group.category,
                });
            }

            // A category listed twice is merged into its first occurrence.
            match groups.iter_mut().find(|g| g.category == group.category) {
                Some(existing) => existing.items.extend(items),
                None => groups.push(CategoryGroup {
                    category: group.category,
                    items,
                }),
            }
        }

        Ok(Self { groups })
    }

    /// Category groups in document order.
    #[must_use]
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Categories that have at least one group in the catalog.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.groups.iter().map(|g| g.category)
    }

    /// Every product, category by category.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    /// Products of one category (empty if the category is absent).
    #[must_use]
    pub fn by_category(&self, category: Category) -> &[Product] {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.items.as_slice())
            .unwrap_or_default()
    }

    /// Look up a product by its exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products().find(|p| p.name == name)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products().find(|p| p.id == id)
    }

    /// Case-insensitive substring search over product names.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}
