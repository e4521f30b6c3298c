//! Per-session shopping carts with option-aware merge semantics.
//!
//! A cart holds ordered line items. Two additions collapse into one line
//! exactly when they reference the same menu item with identical special
//! instructions and an equal choice selection (`choices_match`). The store
//! keeps a *unit* price per line; line totals and cart totals are always
//! derived from it, so repeated quantity updates can never drift.

use crate::api::{AddToCart, ChoiceSelection};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Largest quantity a single line may hold, merges included. Anything
/// bigger is a client bug (or someone probing for overflow) and gets a
/// BadRequest, never a wrapped total.
pub const MAX_QUANTITY: u32 = 999;

/// Structural equality of two choice mappings.
///
/// Order inside a multi-select group is irrelevant, and a scalar selection
/// equals the one-element list with the same content: `{"size": "L"}` and
/// `{"size": ["L"]}` describe the same selection. Groups whose selection is
/// the empty list count as absent.
pub fn choices_match(
    a: &BTreeMap<String, ChoiceSelection>,
    b: &BTreeMap<String, ChoiceSelection>,
) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(choices: &BTreeMap<String, ChoiceSelection>) -> BTreeMap<&str, BTreeSet<&str>> {
    choices
        .iter()
        .filter_map(|(group, selection)| {
            let values: BTreeSet<&str> = match selection {
                ChoiceSelection::One(value) => std::iter::once(value.as_str()).collect(),
                ChoiceSelection::Many(values) => values.iter().map(String::as_str).collect(),
            };
            if values.is_empty() {
                None
            } else {
                Some((group.as_str(), values))
            }
        })
        .collect()
}

/// One entry in a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Identity of the line itself. Distinct from `menu_item_id`: two lines
    /// may reference the same menu item and differ only by choices or
    /// instructions.
    pub cart_item_id: u32,
    pub menu_item_id: u32,
    pub name: String,
    pub image_url: Option<String>,
    /// Always at least 1; a line at quantity zero is removed instead
    pub quantity: u32,
    pub unit_price_cents: u32,
    pub special_instructions: String,
    pub choices: BTreeMap<String, ChoiceSelection>,
}

impl CartLine {
    /// Widened so the product cannot wrap even at u32::MAX unit prices
    pub fn line_total_cents(&self) -> u64 {
        u64::from(self.unit_price_cents) * u64::from(self.quantity)
    }

    fn matches_selection(&self, req: &AddToCart) -> bool {
        self.menu_item_id == req.menu_item_id
            && self.special_instructions == req.special_instructions
            && choices_match(&self.choices, &req.choices)
    }
}

/// Serializable view of a line, with its derived total alongside
#[derive(Debug, Serialize, Deserialize)]
pub struct LineSnapshot {
    #[serde(flatten)]
    pub line: CartLine,
    pub price_cents: u64,
}

/// Serializable view of a whole cart with its derived aggregates
#[derive(Debug, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<LineSnapshot>,
    pub total_cents: u64,
    pub item_count: u64,
}

/// A single session's cart
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_id: u32,
}

impl Cart {
    pub fn new() -> Cart {
        Cart::default()
    }

    /// Lines in insertion order of their first add
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line totals, recomputed from the lines on every read
    pub fn total_cents(&self) -> u64 {
        self.lines.iter().map(CartLine::line_total_cents).sum()
    }

    /// Sum of all line quantities
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a selection to the cart, merging into an existing line when the
    /// menu item, instructions and choices all match. Returns the affected
    /// line.
    pub fn add_item(&mut self, req: AddToCart) -> Result<&CartLine> {
        let unit_price_cents = Self::derive_unit_price(&req)?;

        let index = match self.lines.iter().position(|line| line.matches_selection(&req)) {
            Some(index) => {
                let line = &mut self.lines[index];
                if line.unit_price_cents != unit_price_cents {
                    return Err(Error::BadRequest(format!(
                        "conflicting unit price for menu item {}: cart has {}, request implies {}",
                        req.menu_item_id, line.unit_price_cents, unit_price_cents
                    ))
                    .into());
                }
                // Both sides are already <= MAX_QUANTITY, the sum cannot wrap
                let merged = line.quantity + req.quantity;
                if merged > MAX_QUANTITY {
                    return Err(Error::BadRequest(format!(
                        "quantity {} exceeds the maximum of {}",
                        merged, MAX_QUANTITY
                    ))
                    .into());
                }
                line.quantity = merged;
                index
            }
            None => {
                let cart_item_id = self.next_id;
                self.next_id += 1;
                self.lines.push(CartLine {
                    cart_item_id,
                    menu_item_id: req.menu_item_id,
                    name: req.name,
                    image_url: req.image_url,
                    quantity: req.quantity,
                    unit_price_cents,
                    special_instructions: req.special_instructions,
                    choices: req.choices,
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    /// Replace the contents of an existing line wholesale, keeping its id.
    /// An unknown id is not an error; the caller gets None back.
    pub fn update_item(&mut self, cart_item_id: u32, req: AddToCart) -> Result<Option<&CartLine>> {
        let unit_price_cents = Self::derive_unit_price(&req)?;
        let index = match self.position(cart_item_id) {
            Some(index) => index,
            None => return Ok(None),
        };
        self.lines[index] = CartLine {
            cart_item_id,
            menu_item_id: req.menu_item_id,
            name: req.name,
            image_url: req.image_url,
            quantity: req.quantity,
            unit_price_cents,
            special_instructions: req.special_instructions,
            choices: req.choices,
        };
        Ok(Some(&self.lines[index]))
    }

    /// Set a line's quantity. Zero removes the line; lines never hold a
    /// non-positive quantity or one above MAX_QUANTITY. Unknown ids are a
    /// no-op: the frontend may race a removal against a re-render.
    pub fn update_quantity(
        &mut self,
        cart_item_id: u32,
        quantity: u32,
    ) -> Result<Option<&CartLine>> {
        if quantity == 0 {
            self.remove_item(cart_item_id);
            return Ok(None);
        }
        if quantity > MAX_QUANTITY {
            return Err(Error::BadRequest(format!(
                "quantity {} exceeds the maximum of {}",
                quantity, MAX_QUANTITY
            ))
            .into());
        }
        let index = match self.position(cart_item_id) {
            Some(index) => index,
            None => return Ok(None),
        };
        self.lines[index].quantity = quantity;
        Ok(Some(&self.lines[index]))
    }

    /// Delete a line by id. Absent ids are a no-op, not an error.
    pub fn remove_item(&mut self, cart_item_id: u32) {
        self.lines.retain(|line| line.cart_item_id != cart_item_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            total_cents: self.total_cents(),
            item_count: self.item_count(),
            items: self
                .lines
                .iter()
                .map(|line| LineSnapshot {
                    price_cents: line.line_total_cents(),
                    line: line.clone(),
                })
                .collect(),
        }
    }

    fn position(&self, cart_item_id: u32) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.cart_item_id == cart_item_id)
    }

    /// The request carries the line total pre-multiplied for its quantity.
    /// The stored value is the unit price, so a total that does not divide
    /// evenly is a caller bug and gets rejected instead of rounded.
    fn derive_unit_price(req: &AddToCart) -> Result<u32> {
        if req.quantity == 0 {
            return Err(Error::BadRequest("quantity must be at least 1".to_string()).into());
        }
        if req.quantity > MAX_QUANTITY {
            return Err(Error::BadRequest(format!(
                "quantity {} exceeds the maximum of {}",
                req.quantity, MAX_QUANTITY
            ))
            .into());
        }
        if req.price_cents % req.quantity != 0 {
            return Err(Error::BadRequest(format!(
                "price_cents {} is not a multiple of quantity {}",
                req.price_cents, req.quantity
            ))
            .into());
        }
        Ok(req.price_cents / req.quantity)
    }
}

/// All carts of the running process, keyed by session id.
///
/// This is the only write path to cart state: the server keeps exactly one
/// instance inside its shared state and hands it to the endpoint handlers.
/// Nothing persists across a restart.
#[derive(Debug, Default)]
pub struct SessionCarts {
    carts: HashMap<String, Cart>,
}

impl SessionCarts {
    pub fn new() -> SessionCarts {
        SessionCarts::default()
    }

    pub fn cart_mut(&mut self, session_id: &str) -> &mut Cart {
        self.carts.entry(session_id.to_string()).or_default()
    }

    pub fn cart(&self, session_id: &str) -> Option<&Cart> {
        self.carts.get(session_id)
    }

    /// Drop a session's cart entirely (after checkout, or on clear)
    pub fn drop_cart(&mut self, session_id: &str) {
        self.carts.remove(session_id);
    }
}
