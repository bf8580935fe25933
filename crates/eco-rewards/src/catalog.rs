use serde::{Deserialize, Serialize};

use eco_types::amount::decimal_str;
use eco_types::TokenAmount;

/// A reward that can be bought with tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(with = "decimal_str")]
    pub cost: TokenAmount,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: TokenAmount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }

    /// The partner rewards offered out of the box.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("metrovia", "Metrovía fare", TokenAmount::from_whole(3)),
            Self::new("coffee", "Café", TokenAmount::from_whole(8)),
            Self::new(
                "sweet-coffee",
                "Sweet & Coffee coupon",
                TokenAmount::from_whole(10),
            ),
            Self::new(
                "comisariato",
                "Mi Comisariato discount",
                TokenAmount::from_whole(20),
            ),
        ]
    }
}

/// Redeemable items, looked up by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Items whose cost is covered by `balance`.
    pub fn affordable(&self, balance: TokenAmount) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.items.iter().filter(move |item| item.cost <= balance)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CatalogItem::defaults())
    }
}
