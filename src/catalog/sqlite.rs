use crate::api::{MenuItem, Offer};
use crate::catalog::{Catalog, MenuFilter};
use crate::errors::{Error, Result};
use rusqlite::{params, params_from_iter, Connection, Row};

/// Contains the SQL statements used to interact with the catalog
pub mod sql {
    pub const CREATE_MENU_TABLE: &str = "CREATE TABLE IF NOT EXISTS menu_items (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        price_cents INTEGER NOT NULL,
        category TEXT,
        popular INTEGER NOT NULL DEFAULT 0,
        image_url TEXT,
        start_time TEXT,
        end_time TEXT,
        choices TEXT NOT NULL DEFAULT '[]')";

    pub const CREATE_OFFERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS offers (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT)";

    pub const INSERT_MENU_ITEM: &str = "INSERT INTO menu_items
        (id, slug, name, price_cents, category, popular, image_url, start_time, end_time, choices)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
    pub const INSERT_OFFER: &str =
        "INSERT INTO offers (id, slug, title, description, image_url) VALUES (?1, ?2, ?3, ?4, ?5)";

    pub const DELETE_MENU_ITEMS: &str = "DELETE FROM menu_items";
    pub const DELETE_OFFERS: &str = "DELETE FROM offers";

    pub const SELECT_MENU_COLUMNS: &str = "SELECT id, slug, name, price_cents, category, popular,
        image_url, start_time, end_time, choices FROM menu_items";
    pub const SELECT_OFFERS: &str =
        "SELECT id, slug, title, description, image_url FROM offers ORDER BY id";
    pub const SELECT_OFFER_BY_SLUG: &str =
        "SELECT id, slug, title, description, image_url FROM offers WHERE slug = ?1";
}

/// In-memory SQLite catalog, the storage the server runs with
pub struct SqliteCatalog {
    conn: Connection,
}

fn row_to_item(row: &Row) -> rusqlite::Result<MenuItem> {
    let choices: String = row.get(9)?;
    let choices = serde_json::from_str(&choices).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(MenuItem {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        price_cents: row.get(3)?,
        category: row.get(4)?,
        popular: row.get(5)?,
        image_url: row.get(6)?,
        start_time: row.get(7)?,
        end_time: row.get(8)?,
        choices,
    })
}

fn row_to_offer(row: &Row) -> rusqlite::Result<Offer> {
    Ok(Offer {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
    })
}

impl Catalog for SqliteCatalog {
    fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute(sql::CREATE_MENU_TABLE, [])?;
        conn.execute(sql::CREATE_OFFERS_TABLE, [])?;
        Ok(SqliteCatalog { conn })
    }

    fn replace_menu(&mut self, items: Vec<MenuItem>) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(sql::DELETE_MENU_ITEMS, [])?;
        insert_menu_items(&tx, &items)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_offers(&mut self, offers: Vec<Offer>) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(sql::DELETE_OFFERS, [])?;
        insert_offers(&tx, &offers)?;
        tx.commit()?;
        Ok(())
    }

    fn menu_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>> {
        // The filter shape is known, so the query is assembled from fixed
        // clauses; only values travel as parameters.
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(category) = &filter.category {
            clauses.push("category = ?");
            values.push(category.clone());
        }
        if let Some(exclude) = &filter.exclude_slug {
            clauses.push("slug <> ?");
            values.push(exclude.clone());
        }
        if filter.popular_only {
            clauses.push("popular = 1");
        }

        let mut query = sql::SELECT_MENU_COLUMNS.to_string();
        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY id");
        if let Some(limit) = filter.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        self.conn
            .prepare(&query)?
            .query_map(params_from_iter(values), row_to_item)
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
            .map_err(|err| err.into())
    }

    fn menu_item_by_slug(&self, slug: &str) -> Result<MenuItem> {
        let query = format!("{} WHERE slug = ?1", sql::SELECT_MENU_COLUMNS);
        let items = self
            .conn
            .prepare(&query)?
            .query_map(params![slug], row_to_item)
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())?;

        items
            .into_iter()
            .next()
            .ok_or(Error::NotFound(format!("No menu item with slug '{}'", slug)).into())
    }

    fn offers(&self) -> Result<Vec<Offer>> {
        self.conn
            .prepare(sql::SELECT_OFFERS)?
            .query_map([], row_to_offer)
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
            .map_err(|err| err.into())
    }

    fn offer_by_slug(&self, slug: &str) -> Result<Offer> {
        let offers = self
            .conn
            .prepare(sql::SELECT_OFFER_BY_SLUG)?
            .query_map(params![slug], row_to_offer)
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())?;

        offers
            .into_iter()
            .next()
            .ok_or(Error::NotFound(format!("No offer with slug '{}'", slug)).into())
    }
}

/// Insert a menu snapshot inside an open transaction.
/// Split out to keep the borrow checker happy around the statement.
fn insert_menu_items(tx: &rusqlite::Transaction, items: &[MenuItem]) -> Result<()> {
    let mut stmt = tx.prepare(sql::INSERT_MENU_ITEM)?;
    for item in items {
        let choices = serde_json::to_string(&item.choices)?;
        stmt.execute(params![
            item.id,
            item.slug,
            item.name,
            item.price_cents,
            item.category,
            item.popular,
            item.image_url,
            item.start_time,
            item.end_time,
            choices,
        ])?;
    }
    Ok(())
}

fn insert_offers(tx: &rusqlite::Transaction, offers: &[Offer]) -> Result<()> {
    let mut stmt = tx.prepare(sql::INSERT_OFFER)?;
    for offer in offers {
        stmt.execute(params![
            offer.id,
            offer.slug,
            offer.title,
            offer.description,
            offer.image_url,
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::ChoiceGroup;
    use crate::catalog::test_fixtures::{item, offer};

    #[test]
    fn test_replace_and_query() {
        let mut catalog = SqliteCatalog::new().unwrap();
        catalog
            .replace_menu(vec![
                item(1, "margherita", "mains", false),
                item(2, "tiramisu", "desserts", true),
                item(3, "diavola", "mains", true),
            ])
            .unwrap();

        let all = catalog.menu_items(&MenuFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].slug, "margherita");

        let filtered = catalog
            .menu_items(&MenuFilter {
                category: Some("mains".to_string()),
                exclude_slug: Some("margherita".to_string()),
                popular_only: true,
                limit: Some(5),
            })
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].slug, "diavola");

        // a second replace fully swaps the snapshot
        catalog
            .replace_menu(vec![item(9, "calzone", "mains", false)])
            .unwrap();
        let all = catalog.menu_items(&MenuFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert!(catalog.menu_item_by_slug("margherita").is_err());
        assert_eq!(catalog.menu_item_by_slug("calzone").unwrap().id, 9);
    }

    #[test]
    fn test_choices_round_trip_through_storage() {
        let mut catalog = SqliteCatalog::new().unwrap();
        let mut pizza = item(1, "margherita", "mains", false);
        pizza.choices = vec![ChoiceGroup {
            id: "size".to_string(),
            name: "Size".to_string(),
            required: true,
            max_selectable: 1,
            options: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        }];
        pizza.start_time = Some("11:00:00".to_string());
        pizza.end_time = Some("15:00:00".to_string());
        catalog.replace_menu(vec![pizza]).unwrap();

        let stored = catalog.menu_item_by_slug("margherita").unwrap();
        assert_eq!(stored.choices.len(), 1);
        assert_eq!(stored.choices[0].options.len(), 3);
        assert_eq!(stored.start_time.as_deref(), Some("11:00:00"));
    }

    #[test]
    fn test_offers() {
        let mut catalog = SqliteCatalog::new().unwrap();
        catalog
            .replace_offers(vec![offer(1, "two-for-one"), offer(2, "happy-hour")])
            .unwrap();

        assert_eq!(catalog.offers().unwrap().len(), 2);
        assert_eq!(catalog.offer_by_slug("happy-hour").unwrap().id, 2);
        assert!(catalog.offer_by_slug("missing").is_err());
    }
}
