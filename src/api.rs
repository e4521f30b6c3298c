// This file contains the basic types used to communicate through the API
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON envelope used by the upstream content API and mirrored on our own
/// surface, so the frontend reads both the same way
#[derive(Serialize, Deserialize, Debug)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Envelope { data }
    }
}

/// A named option group attached to a menu item (e.g. size, add-ons)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChoiceGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub max_selectable: u32,
    #[serde(default)]
    pub options: Vec<String>,
}

/// A menu item, as published by the upstream content API
///
/// All prices are integer cents, there is no floating point anywhere in
/// price arithmetic.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MenuItem {
    /// Unique ID, assigned upstream
    pub id: u32,
    /// URL-safe identifier used by the detail routes
    pub slug: String,
    pub name: String,
    /// Unit price in cents
    pub price_cents: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Start of the availability window, "HH:MM:SS". None means the item
    /// is orderable at any pickup time.
    #[serde(default)]
    pub start_time: Option<String>,
    /// End of the availability window, "HH:MM:SS", inclusive
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChoiceGroup>,
}

/// A promotional offer, as published by the upstream content API
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Offer {
    pub id: u32,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The selection made for one choice group.
///
/// The frontend sends both `{"size": "L"}` and `{"size": ["L"]}` depending
/// on whether the group is single- or multi-select. Both deserialize here;
/// the cart treats them as the same selection (see `cart::choices_match`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ChoiceSelection {
    One(String),
    Many(Vec<String>),
}

/// Body of an add-to-cart request.
///
/// `price_cents` is the line total for `quantity` units, pre-multiplied by
/// the caller. The cart derives and stores the unit price from it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddToCart {
    pub menu_item_id: u32,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price_cents: u32,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub choices: BTreeMap<String, ChoiceSelection>,
}

/// Body of a quantity update. Zero means "remove the line".
#[derive(Serialize, Deserialize, Debug)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

/// Payload of a successful payment initiation, as returned by the gateway
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentReceiptData {
    pub order_id: String,
    /// Required by the downstream order-status streaming channel
    pub unique_id: String,
}

/// Full payment initiation response, proxied back to the frontend verbatim
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentReceipt {
    pub data: PaymentReceiptData,
    pub message: String,
}

/// Body of an on-demand revalidation request
#[derive(Serialize, Deserialize, Debug)]
pub struct RevalidateRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}
