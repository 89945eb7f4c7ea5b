//! URL query string sync for [`ProductFilters`].
//!
//! Parameters: `search`, `category`, `minPrice`, `maxPrice`, `colors` and
//! `sizes` (comma-separated), `style`, `inStock`, `sort`. Only fields that
//! differ from the defaults are written, so a fresh listing has a clean URL.

use std::str::FromStr;

use rust_decimal::Decimal;
use url::form_urlencoded;

use super::{PriceRange, ProductFilters, SortBy};

/// Filter fields read from a URL. `None` means the parameter was absent or
/// unparseable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub style: Option<String>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<SortBy>,
}

impl PartialFilters {
    /// Parse a query string, with or without the leading `?`.
    ///
    /// Unknown parameters and malformed values are ignored.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut partial = Self::default();

        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match &*name {
                "search" => partial.search = Some(value.to_owned()),
                "category" => partial.category = Some(value.to_owned()),
                "minPrice" => partial.min_price = Decimal::from_str(value).ok(),
                "maxPrice" => partial.max_price = Decimal::from_str(value).ok(),
                "colors" => partial.colors = Some(split_list(value)),
                "sizes" => partial.sizes = Some(split_list(value)),
                "style" => partial.style = Some(value.to_owned()),
                "inStock" => partial.in_stock = parse_flag(value),
                "sort" => partial.sort_by = value.parse().ok(),
                _ => {}
            }
        }
        partial
    }

    /// True when no parameter was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `state` that are present here.
    #[must_use]
    pub fn merge_into(self, state: ProductFilters) -> ProductFilters {
        ProductFilters {
            search: self.search.unwrap_or(state.search),
            category: self.category.unwrap_or(state.category),
            price_range: PriceRange {
                min: self.min_price.unwrap_or(state.price_range.min),
                max: self.max_price.unwrap_or(state.price_range.max),
            },
            colors: self.colors.unwrap_or(state.colors),
            sizes: self.sizes.unwrap_or(state.sizes),
            style: self.style.unwrap_or(state.style),
            in_stock: self.in_stock.unwrap_or(state.in_stock),
            sort_by: self.sort_by.unwrap_or(state.sort_by),
        }
    }
}

impl ProductFilters {
    /// Encode the non-default fields as a query string (no leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let defaults = PriceRange::default();
        let mut query = form_urlencoded::Serializer::new(String::new());

        if !self.search.trim().is_empty() {
            query.append_pair("search", self.search.trim());
        }
        if !self.category.is_empty() {
            query.append_pair("category", &self.category);
        }
        if self.price_range.min != defaults.min {
            query.append_pair("minPrice", &self.price_range.min.normalize().to_string());
        }
        if self.price_range.max != defaults.max {
            query.append_pair("maxPrice", &self.price_range.max.normalize().to_string());
        }
        if !self.colors.is_empty() {
            query.append_pair("colors", &self.colors.join(","));
        }
        if !self.sizes.is_empty() {
            query.append_pair("sizes", &self.sizes.join(","));
        }
        if !self.style.is_empty() {
            query.append_pair("style", &self.style);
        }
        if self.in_stock {
            query.append_pair("inStock", "true");
        }
        if self.sort_by != SortBy::default() {
            query.append_pair("sort", self.sort_by.as_str());
        }

        query.finish()
    }

    /// Filters described by a query string, defaults elsewhere.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        PartialFilters::from_query_string(query).merge_into(Self::default())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterAction, reduce};

    #[test]
    fn test_default_filters_give_empty_query() {
        assert_eq!(ProductFilters::default().to_query_string(), "");
        assert!(PartialFilters::from_query_string("").is_empty());
        assert!(PartialFilters::from_query_string("?utm_source=mail").is_empty());
    }

    #[test]
    fn test_only_changed_fields_are_written() {
        let filters = ProductFilters {
            search: "linen shirt".into(),
            price_range: PriceRange::new(Decimal::ZERO, Decimal::new(2500, 2)),
            colors: vec!["Red".into(), "Navy Blue".into()],
            in_stock: true,
            sort_by: SortBy::PriceAsc,
            ..ProductFilters::default()
        };
        assert_eq!(
            filters.to_query_string(),
            "search=linen+shirt&maxPrice=25&colors=Red%2CNavy+Blue&inStock=true&sort=price-asc"
        );
        assert_eq!(ProductFilters::from_query_string(&filters.to_query_string()), filters);
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let partial = PartialFilters::from_query_string(
            "?minPrice=abc&maxPrice=80&sizes=S,,M&inStock=maybe&sort=best&style=",
        );
        assert_eq!(partial.min_price, None);
        assert_eq!(partial.max_price, Some(Decimal::new(80, 0)));
        assert_eq!(partial.sizes, Some(vec!["S".to_string(), "M".to_string()]));
        assert_eq!(partial.in_stock, None);
        assert_eq!(partial.sort_by, None);
        assert_eq!(partial.style, None);
    }

    #[test]
    fn test_init_from_url_merges_present_fields_only() {
        let state = ProductFilters {
            category: "Jeans".into(),
            sort_by: SortBy::Newest,
            ..ProductFilters::default()
        };
        let partial = PartialFilters::from_query_string("colors=Black&inStock=1");
        let next = reduce(state, FilterAction::InitFromUrl(partial));

        assert_eq!(next.category, "Jeans");
        assert_eq!(next.sort_by, SortBy::Newest);
        assert_eq!(next.colors, vec!["Black"]);
        assert!(next.in_stock);
    }
}
