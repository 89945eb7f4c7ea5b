//! Product filter state, its reducer and client-side filtering.
//!
//! [`ProductFilters`] is plain state. It only changes through [`reduce`],
//! which takes the current state and a [`FilterAction`] and returns the next
//! state. [`apply`] runs the filters over a product list. The state
//! round-trips through a URL query string (see [`query_string`]).

pub mod query_string;

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;

pub use query_string::PartialFilters;

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max: Decimal,
}

impl PriceRange {
    pub const DEFAULT_MIN: Decimal = Decimal::ZERO;
    pub const DEFAULT_MAX: Decimal = Decimal::ONE_THOUSAND;

    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    Newest,
    /// Keeps the API's order; there is no popularity signal to sort on.
    #[default]
    MostPopular,
}

impl SortBy {
    pub const ALL: [Self; 4] = [Self::PriceAsc, Self::PriceDesc, Self::Newest, Self::MostPopular];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
            Self::MostPopular => "most-popular",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            // Undated products sort last.
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::MostPopular => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == lower)
            .ok_or_else(|| format!("unknown sort order: {s}"))
    }
}

/// Product listing filters.
///
/// Empty strings and lists mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub search: String,
    pub category: String,
    pub price_range: PriceRange,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub style: String,
    pub in_stock: bool,
    pub sort_by: SortBy,
}

impl ProductFilters {
    /// Number of constraints that differ from the defaults, sort excluded.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [
            !self.search.trim().is_empty(),
            !self.category.is_empty(),
            self.price_range != PriceRange::default(),
            !self.colors.is_empty(),
            !self.sizes.is_empty(),
            !self.style.is_empty(),
            self.in_stock,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether `product` passes every active constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && matches_exact(&self.category, &product.category)
            && self.price_range.contains(product.price)
            && matches_any(&self.colors, &product.colors)
            && matches_any(&self.sizes, &product.sizes)
            && matches_exact(&self.style, &product.style)
            && (!self.in_stock || product.stock > 0)
    }

    fn matches_search(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&product.name, &product.description, &product.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn matches_exact(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted.to_lowercase() == actual.to_lowercase()
}

/// Any selected value present on the product. Nothing selected matches all.
fn matches_any(selected: &[String], values: &[String]) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .any(|s| values.iter().any(|v| v.eq_ignore_ascii_case(s)))
}

/// A change to [`ProductFilters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetSearch(String),
    SetCategory(String),
    SetPriceRange(PriceRange),
    SetColors(Vec<String>),
    SetSizes(Vec<String>),
    SetStyle(String),
    SetInStock(bool),
    SetSortBy(SortBy),
    /// Add the color if absent, remove it if present.
    ToggleColor(String),
    ToggleSize(String),
    /// Reset everything except the sort order.
    ClearAll,
    /// Overwrite only the fields present in the parsed URL.
    InitFromUrl(PartialFilters),
}

/// Compute the next filter state.
#[must_use]
pub fn reduce(state: ProductFilters, action: FilterAction) -> ProductFilters {
    match action {
        FilterAction::SetSearch(search) => ProductFilters { search, ..state },
        FilterAction::SetCategory(category) => ProductFilters { category, ..state },
        FilterAction::SetPriceRange(price_range) => ProductFilters {
            price_range,
            ..state
        },
        FilterAction::SetColors(colors) => ProductFilters { colors, ..state },
        FilterAction::SetSizes(sizes) => ProductFilters { sizes, ..state },
        FilterAction::SetStyle(style) => ProductFilters { style, ..state },
        FilterAction::SetInStock(in_stock) => ProductFilters { in_stock, ..state },
        FilterAction::SetSortBy(sort_by) => ProductFilters { sort_by, ..state },
        FilterAction::ToggleColor(color) => {
            let mut next = state;
            toggle(&mut next.colors, color);
            next
        }
        FilterAction::ToggleSize(size) => {
            let mut next = state;
            toggle(&mut next.sizes, size);
            next
        }
        FilterAction::ClearAll => ProductFilters {
            sort_by: state.sort_by,
            ..ProductFilters::default()
        },
        FilterAction::InitFromUrl(partial) => partial.merge_into(state),
    }
}

fn toggle(values: &mut Vec<String>, value: String) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

/// Filter and sort `products`. Sorting is stable.
#[must_use]
pub fn apply(filters: &ProductFilters, products: &[Product]) -> Vec<Product> {
    let mut matched: Vec<Product> = products
        .iter()
        .filter(|product| filters.matches(product))
        .cloned()
        .collect();
    if filters.sort_by != SortBy::MostPopular {
        matched.sort_by(|a, b| filters.sort_by.compare(a, b));
    }
    matched
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::normalize::normalize_product;

    fn product(raw: serde_json::Value) -> Product {
        normalize_product(&raw).unwrap()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(json!({"_id": "1", "name": "Slim Jeans", "category": "Jeans", "price": 60,
                "colors": ["Blue"], "sizes": ["M"], "stock": 3, "style": "Casual",
                "createdAt": "2024-03-01"})),
            product(json!({"_id": "2", "name": "Wide Jeans", "category": "Jeans", "price": 140,
                "colors": ["Black"], "sizes": ["L"], "stock": 0, "style": "Casual",
                "createdAt": "2024-05-01"})),
            product(json!({"_id": "3", "name": "Linen Shirt", "category": "Shirts", "price": 45,
                "description": "Breathable summer jeans alternative", "colors": ["White"],
                "sizes": ["M", "L"], "stock": 10, "style": "Formal"})),
            product(json!({"_id": "4", "name": "Denim Jacket", "category": "Jackets", "price": 60,
                "colors": ["Blue"], "stock": 2, "createdAt": "2024-04-01"})),
        ]
    }

    #[test]
    fn test_clear_all_keeps_sort() {
        let dirty = ProductFilters {
            search: "tee".into(),
            category: "Shirts".into(),
            price_range: PriceRange::new(Decimal::TEN, Decimal::ONE_HUNDRED),
            colors: vec!["Red".into()],
            sizes: vec!["S".into()],
            style: "Casual".into(),
            in_stock: true,
            sort_by: SortBy::PriceDesc,
        };
        let cleared = reduce(dirty, FilterAction::ClearAll);
        assert_eq!(
            cleared,
            ProductFilters {
                sort_by: SortBy::PriceDesc,
                ..ProductFilters::default()
            }
        );
        assert_eq!(cleared.active_count(), 0);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let state = reduce(ProductFilters::default(), FilterAction::ToggleColor("Red".into()));
        let state = reduce(state, FilterAction::ToggleColor("Blue".into()));
        assert_eq!(state.colors, vec!["Red", "Blue"]);
        let state = reduce(state, FilterAction::ToggleColor("Red".into()));
        assert_eq!(state.colors, vec!["Blue"]);

        let state = reduce(state, FilterAction::ToggleSize("XL".into()));
        assert_eq!(state.sizes, vec!["XL"]);
    }

    #[test]
    fn test_setters_touch_one_field() {
        let state = reduce(ProductFilters::default(), FilterAction::SetInStock(true));
        let state = reduce(state, FilterAction::SetCategory("Jeans".into()));
        assert!(state.in_stock);
        assert_eq!(state.category, "Jeans");
        assert_eq!(state.active_count(), 2);
        assert_eq!(state.sort_by, SortBy::MostPopular);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filters = ProductFilters {
            category: "jeans".into(),
            price_range: PriceRange::new(Decimal::ZERO, Decimal::ONE_HUNDRED),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&filters, &catalog())), vec!["1"]);
    }

    #[test]
    fn test_colors_match_any_selected() {
        let products = vec![
            product(json!({"_id": "a", "colors": ["Blue"]})),
            product(json!({"_id": "b", "colors": ["Green"]})),
        ];
        let filters = ProductFilters {
            colors: vec!["Red".into(), "Blue".into()],
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&filters, &products)), vec!["a"]);
    }

    #[test]
    fn test_search_covers_name_description_and_category() {
        let filters = ProductFilters {
            search: "  JEANS ".into(),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&filters, &catalog())), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_in_stock_and_style() {
        let filters = ProductFilters {
            in_stock: true,
            style: "casual".into(),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&filters, &catalog())), vec!["1"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filters = ProductFilters {
            price_range: PriceRange::new(Decimal::new(45, 0), Decimal::new(60, 0)),
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&filters, &catalog())), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_sorting_is_stable() {
        let asc = ProductFilters {
            sort_by: SortBy::PriceAsc,
            ..ProductFilters::default()
        };
        // 1 and 4 share a price and keep their input order.
        assert_eq!(ids(&apply(&asc, &catalog())), vec!["3", "1", "4", "2"]);

        let desc = ProductFilters {
            sort_by: SortBy::PriceDesc,
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&desc, &catalog())), vec!["2", "1", "4", "3"]);
    }

    #[test]
    fn test_newest_first_and_most_popular_keeps_order() {
        let newest = ProductFilters {
            sort_by: SortBy::Newest,
            ..ProductFilters::default()
        };
        assert_eq!(ids(&apply(&newest, &catalog())), vec!["2", "4", "1", "3"]);
        assert_eq!(
            ids(&apply(&ProductFilters::default(), &catalog())),
            vec!["1", "2", "3", "4"]
        );
    }

    #[test]
    fn test_sort_strings() {
        for sort in SortBy::ALL {
            assert_eq!(sort.to_string().parse::<SortBy>().unwrap(), sort);
        }
        assert!("cheapest".parse::<SortBy>().is_err());
    }
}
