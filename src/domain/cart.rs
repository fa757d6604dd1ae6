use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type ItemId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: BigDecimal,
    pub image: String,
}

impl MenuItem {
    pub fn new(id: ItemId, name: &str, price: u32, image: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price: BigDecimal::from(price),
            image: image.to_string(),
        }
    }
}

/// One menu item's presence in the cart.
///
/// `quantity` is at least 1 for as long as the line exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ItemId,
    pub name: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: BigDecimal,
    pub image: String,
    #[serde(deserialize_with = "deserialize_quantity")]
    pub quantity: u32,
    pub selected: bool,
}

impl CartLine {
    /// New lines start with one unit and are selected, so they count towards
    /// the checkout total straight away.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price.clone(),
            image: item.image.clone(),
            quantity: 1,
            selected: true,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

/// Ordered sequence of cart lines, at most one per item id.
///
/// Serializes as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn find(&self, id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    pub(crate) fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub(crate) fn remove(&mut self, id: ItemId) {
        self.lines.retain(|l| l.id != id);
    }

    pub(crate) fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&CartLine) -> bool,
    {
        self.lines.retain(f);
    }

    /// Total number of units across all lines, selected or not.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn selected_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| l.selected)
    }

    pub fn has_selection(&self) -> bool {
        self.lines.iter().any(|l| l.selected)
    }

    pub fn selected_subtotal(&self) -> BigDecimal {
        self.selected_lines()
            .fold(BigDecimal::from(0), |acc, l| acc + l.line_total())
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

/// Prices are stored as JSON numbers, integral ones without a fraction.
fn serialize_price<S: Serializer>(price: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    if price.is_integer() {
        if let Some(whole) = price.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match price.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => Err(serde::ser::Error::custom(format!("price {} is not representable", price))),
    }
}

/// Any JSON number is accepted. Negative, fractional or zero quantities
/// come out as 0 so the line is dropped on load instead of failing the
/// whole cart.
fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    let quantity = if let Some(whole) = number.as_u64() {
        u32::try_from(whole).unwrap_or(u32::MAX)
    } else if number.as_i64().is_some() {
        0
    } else {
        match number.as_f64() {
            Some(value) if value >= 1.0 && value.fract() == 0.0 => {
                value.min(f64::from(u32::MAX)) as u32
            }
            _ => 0,
        }
    };
    Ok(quantity)
}

/// Render an amount with exactly two decimal places, e.g. `440.00`.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: ItemId, price: u32, quantity: u32, selected: bool) -> CartLine {
        CartLine {
            quantity,
            selected,
            ..CartLine::from_menu_item(&MenuItem::new(id, "Dish", price, "img/dish.jpeg"))
        }
    }

    #[test]
    fn from_menu_item_starts_selected_with_one_unit() {
        let item = MenuItem::new(3, "Chicken Tikka", 220, "img/chicken_tikka.jpeg");
        let line = CartLine::from_menu_item(&item);

        assert_eq!(line.id, 3);
        assert_eq!(line.name, "Chicken Tikka");
        assert_eq!(line.price, BigDecimal::from(220));
        assert_eq!(line.quantity, 1);
        assert!(line.selected);
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line(1, 350, 3, true).line_total(), BigDecimal::from(1050));
    }

    #[test]
    fn item_count_includes_unselected_lines() {
        let cart = Cart::from(vec![line(1, 350, 2, true), line(2, 280, 3, false)]);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn selected_subtotal_skips_unselected_lines() {
        let cart = Cart::from(vec![
            line(3, 220, 2, true),
            line(4, 320, 1, false),
            line(6, 30, 4, true),
        ]);
        assert_eq!(cart.selected_subtotal(), BigDecimal::from(560));
        assert!(cart.has_selection());
    }

    #[test]
    fn empty_cart_has_no_selection_and_zero_subtotal() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert!(!cart.has_selection());
        assert_eq!(cart.selected_subtotal(), BigDecimal::from(0));
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn serializes_as_bare_array() {
        let cart = Cart::from(vec![line(5, 180, 1, false)]);
        let json = serde_json::to_value(&cart).expect("serialize");

        assert!(json.is_array());
        assert_eq!(json[0]["id"], 5);
        assert!(json[0]["price"].is_number());
        assert_eq!(json[0]["price"], 180);
        assert_eq!(json[0]["quantity"], 1);
        assert_eq!(json[0]["selected"], false);
    }

    #[test]
    fn deserializes_numeric_prices() {
        let raw = r#"[{"id":3,"name":"Chicken Tikka","price":220,"image":"img/chicken_tikka.jpeg","quantity":2,"selected":true}]"#;
        let cart: Cart = serde_json::from_str(raw).expect("deserialize");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].price, BigDecimal::from(220));
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn fractional_price_is_written_as_a_number() {
        let mut tea = line(13, 0, 1, true);
        tea.price = "45.5".parse().expect("decimal");
        let json = serde_json::to_value(&tea).expect("serialize");

        assert_eq!(json["price"], 45.5);
    }

    #[test]
    fn out_of_range_quantities_read_as_zero() {
        let raw = r#"[
            {"id":1,"name":"A","price":10,"image":"a","quantity":-1,"selected":true},
            {"id":2,"name":"B","price":10,"image":"b","quantity":2.0,"selected":true},
            {"id":3,"name":"C","price":10,"image":"c","quantity":1.5,"selected":true}
        ]"#;
        let cart: Cart = serde_json::from_str(raw).expect("deserialize");
        let quantities: Vec<u32> = cart.lines().iter().map(|l| l.quantity).collect();

        assert_eq!(quantities, vec![0, 2, 0]);
    }

    #[test]
    fn format_amount_pads_to_two_decimals() {
        assert_eq!(format_amount(&BigDecimal::from(440)), "440.00");
        assert_eq!(format_amount(&BigDecimal::from(0)), "0.00");
    }
}
