use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::{format_amount, Cart, CartLine, ItemId, MenuItem};

// ── Pages ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Menu,
    Cart,
    Checkout,
}

impl FromStr for Page {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(Page::Menu),
            "cart" => Ok(Page::Cart),
            "checkout" => Ok(Page::Checkout),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::Menu => "menu",
            Page::Cart => "cart",
            Page::Checkout => "checkout",
        };
        f.write_str(name)
    }
}

// ── Response views ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: ItemId,
    pub name: String,
    /// Decimal price as a string, e.g. "220.00"
    pub price: String,
    pub image: String,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: format_amount(&item.price),
            image: item.image.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLineResponse {
    pub id: ItemId,
    pub name: String,
    pub price: String,
    pub image: String,
    pub quantity: u32,
    pub selected: bool,
    pub line_total: String,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            price: format_amount(&line.price),
            image: line.image.clone(),
            quantity: line.quantity,
            selected: line.selected,
            line_total: format_amount(&line.line_total()),
        }
    }
}

/// Everything the cart page shows: all lines, the badge count and the
/// totals of the selected lines.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLineResponse>,
    pub item_count: u64,
    pub selected_subtotal: String,
    pub total: String,
    pub checkout_enabled: bool,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = format_amount(&cart.selected_subtotal());
        Self {
            lines: cart.lines().iter().map(CartLineResponse::from).collect(),
            item_count: cart.item_count(),
            selected_subtotal: subtotal.clone(),
            total: subtotal,
            checkout_enabled: cart.has_selection(),
            is_empty: cart.is_empty(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartCountResponse {
    pub item_count: u64,
}

/// Selected lines only.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSummary {
    pub lines: Vec<CartLineResponse>,
    pub total: String,
}

impl From<&Cart> for CheckoutSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.selected_lines().map(CartLineResponse::from).collect(),
            total: format_amount(&cart.selected_subtotal()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageView {
    pub page: Page,
    pub show_back_to_menu: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuItemResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutSummary>,
}

impl PageView {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            show_back_to_menu: page != Page::Menu,
            menu: None,
            cart: None,
            checkout: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewOrderResponse {
    pub page: Page,
    pub item_count: u64,
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub item_id: ItemId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    /// Zero or less removes the line.
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustQuantityRequest {
    /// Usually +1 or -1.
    pub change: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetSelectionRequest {
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    /// Returns the first missing required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: String,
    pub customer: CheckoutRequest,
    pub lines: Vec<CartLineResponse>,
    pub total: String,
}
