use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Character,
    Accessory,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShopItem {
    pub id: String,
    pub display_name: String,
    pub kind: ItemKind,
    #[serde(default = "default_uses_coins")]
    pub uses_game_coins: bool,
    pub coin_cost: u32,
    #[serde(default = "default_refund_percent")]
    pub refund_percent: f32,
    /// Replaces the computed refund when non-zero.
    #[serde(default)]
    pub override_sell_price: u32,
}

fn default_uses_coins() -> bool {
    true
}

fn default_refund_percent() -> f32 {
    0.5
}

impl ShopItem {
    pub fn sell_price(&self) -> u32 {
        if self.override_sell_price > 0 {
            return self.override_sell_price;
        }
        let percent = self.refund_percent.clamp(0.0, 1.0);
        (self.coin_cost as f32 * percent).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Bought,
    AlreadyOwned,
    UnknownItem,
    NotForCoins,
}

pub fn default_shop_items() -> Vec<ShopItem> {
    let item = |id: &str, name: &str, kind: ItemKind, cost: u32| ShopItem {
        id: id.to_string(),
        display_name: name.to_string(),
        kind,
        uses_game_coins: true,
        coin_cost: cost,
        refund_percent: 0.5,
        override_sell_price: 0,
    };

    vec![
        item("char_hootie", "Hootie", ItemKind::Character, 0),
        item("char_poppi", "Poppi", ItemKind::Character, 150),
        item("char_bolt", "Bolt", ItemKind::Character, 300),
        item("hat_star", "Star Hat", ItemKind::Accessory, 60),
    ]
}
