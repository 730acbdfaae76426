//! Catalog inspection commands.
//!
//! Both commands read the bundled catalog unless `--file` points at another
//! catalog document, which makes `print` a cheap validator for catalog edits.

use std::fmt::Write as _;
use std::path::Path;

use sweet_treats_core::{Catalog, CatalogError, Product};

/// Errors from loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogCommandError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Load the catalog from `file`, or the bundled one.
///
/// # Errors
///
/// Returns `CatalogCommandError` if the file cannot be read or parsed.
pub async fn load(file: Option<&Path>) -> Result<Catalog, CatalogCommandError> {
    let Some(path) = file else {
        return Ok(Catalog::bundled()?);
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogCommandError::Read {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Catalog::from_json(&json)?)
}

/// Render every category and its products as a plain-text menu.
#[must_use]
pub fn render_menu(catalog: &Catalog) -> String {
    let mut out = String::new();
    for group in catalog.groups() {
        let _ = writeln!(out, "{}", group.category);
        for product in &group.items {
            let _ = writeln!(out, "{}", render_product(product));
        }
    }
    out
}

fn render_product(product: &Product) -> String {
    format!(
        "  {:>3}  {:<24} {}",
        product.id.as_i32(),
        product.name,
        product.price
    )
}

/// Print the menu.
///
/// # Errors
///
/// Returns `CatalogCommandError` if the catalog cannot be loaded.
pub async fn print(file: Option<&Path>) -> Result<(), CatalogCommandError> {
    let catalog = load(file).await?;
    tracing::info!(products = catalog.products().count(), "Catalog loaded");

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render_menu(&catalog));
    }
    Ok(())
}

/// Print products whose name contains `query`.
///
/// # Errors
///
/// Returns `CatalogCommandError` if the catalog cannot be loaded.
pub async fn search(query: &str, file: Option<&Path>) -> Result<(), CatalogCommandError> {
    let catalog = load(file).await?;
    let results = catalog.search(query);

    #[allow(clippy::print_stdout)]
    {
        if results.is_empty() {
            println!("No products match {query:?}");
        }
        for product in results {
            println!("{}", render_product(product));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_bundled() {
        let catalog = load(None).await.unwrap();
        assert_eq!(catalog.products().count(), 13);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(Some(Path::new("/nonexistent/catalog.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogCommandError::Read { .. }));
    }

    #[test]
    fn test_render_menu() {
        let catalog = Catalog::bundled().unwrap();
        let menu = render_menu(&catalog);
        assert!(menu.starts_with("Cakes\n"));
        assert!(menu.contains("Chocolate Fudge Cake"));
        assert!(menu.contains("Rs 2000.00"));
        assert_eq!(menu.lines().count(), 3 + 13);
    }
}
