use crate::api::{MenuItem, Offer};
use crate::errors::{Error, Result};

pub mod sqlite;

/// Filters accepted by the menu listing endpoint
#[derive(Debug, Default, Clone)]
pub struct MenuFilter {
    pub category: Option<String>,
    /// Slug to leave out, used by "related items" queries
    pub exclude_slug: Option<String>,
    pub popular_only: bool,
    pub limit: Option<u32>,
}

/// Trait hiding the catalog storage.
///
/// The catalog is a read-through copy of the upstream content API, replaced
/// wholesale on startup and on revalidation. The trait keeps a mock for
/// unit tests next to the SQLite implementation used by the server.
pub trait Catalog {
    /// Create a new empty catalog
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// Swap the whole menu for a fresh upstream snapshot
    fn replace_menu(&mut self, items: Vec<MenuItem>) -> Result<()>;

    /// Swap all offers for a fresh upstream snapshot
    fn replace_offers(&mut self, offers: Vec<Offer>) -> Result<()>;

    /// List menu items matching the filter, in upstream id order
    fn menu_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>>;

    /// Retrieve a single menu item; unknown slugs are a NotFound error
    fn menu_item_by_slug(&self, slug: &str) -> Result<MenuItem>;

    fn offers(&self) -> Result<Vec<Offer>>;

    fn offer_by_slug(&self, slug: &str) -> Result<Offer>;
}

pub mod mock {
    use super::*;

    /// Vec-backed catalog for unit tests
    #[derive(Default)]
    pub struct MockCatalog {
        items: Vec<MenuItem>,
        offers: Vec<Offer>,
    }

    impl Catalog for MockCatalog {
        fn new() -> Result<Self> {
            Ok(MockCatalog::default())
        }

        fn replace_menu(&mut self, items: Vec<MenuItem>) -> Result<()> {
            self.items = items;
            Ok(())
        }

        fn replace_offers(&mut self, offers: Vec<Offer>) -> Result<()> {
            self.offers = offers;
            Ok(())
        }

        fn menu_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>> {
            let mut items: Vec<MenuItem> = self
                .items
                .iter()
                .filter(|item| {
                    filter
                        .category
                        .as_ref()
                        .is_none_or(|c| item.category.as_deref() == Some(c.as_str()))
                })
                .filter(|item| filter.exclude_slug.as_ref().is_none_or(|s| item.slug != *s))
                .filter(|item| !filter.popular_only || item.popular)
                .cloned()
                .collect();
            items.sort_by_key(|item| item.id);
            if let Some(limit) = filter.limit {
                items.truncate(limit as usize);
            }
            Ok(items)
        }

        fn menu_item_by_slug(&self, slug: &str) -> Result<MenuItem> {
            self.items
                .iter()
                .find(|item| item.slug == slug)
                .cloned()
                .ok_or(Error::NotFound(format!("No menu item with slug '{}'", slug)).into())
        }

        fn offers(&self) -> Result<Vec<Offer>> {
            Ok(self.offers.clone())
        }

        fn offer_by_slug(&self, slug: &str) -> Result<Offer> {
            self.offers
                .iter()
                .find(|offer| offer.slug == slug)
                .cloned()
                .ok_or(Error::NotFound(format!("No offer with slug '{}'", slug)).into())
        }
    }

}

#[cfg(test)]
pub mod test_fixtures {
    use super::*;

    pub fn item(id: u32, slug: &str, category: &str, popular: bool) -> MenuItem {
        MenuItem {
            id,
            slug: slug.to_string(),
            name: slug.replace('-', " "),
            price_cents: 100 * id,
            category: Some(category.to_string()),
            popular,
            image_url: None,
            start_time: None,
            end_time: None,
            choices: vec![],
        }
    }

    pub fn offer(id: u32, slug: &str) -> Offer {
        Offer {
            id,
            slug: slug.to_string(),
            title: slug.replace('-', " "),
            description: String::new(),
            image_url: None,
        }
    }
}
