use super::cart::{ItemId, MenuItem};
use super::ports::MenuLookup;

/// The fixed catalog of purchasable dishes.
#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// The house menu served by the storefront binary.
    pub fn restaurant() -> Self {
        Self::new(vec![
            MenuItem::new(1, "Kacchi Biryani", 350, "img/biriyani.jpeg"),
            MenuItem::new(2, "Beef Bhuna", 280, "img/beef_bhuna.jpeg"),
            MenuItem::new(3, "Chicken Tikka", 220, "img/chicken_tikka.jpeg"),
            MenuItem::new(4, "Mutton Rezala", 320, "img/mutton_rezala.jpeg"),
            MenuItem::new(5, "Fish Curry", 180, "img/fish_curry.jpeg"),
            MenuItem::new(6, "Plain Naan", 30, "img/plain_nun.jpeg"),
            MenuItem::new(7, "Butter Naan", 40, "img/butter_naan.jpeg"),
            MenuItem::new(8, "Mixed Vegetables", 120, "img/mixed_vegetables.jpeg"),
            MenuItem::new(9, "Dal", 100, "img/dal.jpeg"),
            MenuItem::new(10, "Fried Chicken", 250, "img/fried_chicken.jpeg"),
            MenuItem::new(11, "Iced Coffee", 120, "img/iced_coffe.jpeg"),
            MenuItem::new(12, "Jilapi", 50, "img/jilapi.jpeg"),
        ])
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}

impl MenuLookup for Menu {
    fn find_item(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.find_item(id)
    }
}
