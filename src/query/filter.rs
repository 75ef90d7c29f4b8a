use serde::{Deserialize, Serialize};

use super::parse::parse_optional;
use crate::models::hotel::Hotel;

/// Rows per page. Fixed for every listing.
pub const PAGE_SIZE: u32 = 10;

/// Raw listing parameters exactly as they appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelQuery {
    pub name: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub rating: Option<String>,
    pub page: Option<String>,
}

/// Conjunction of the constraints a listing applies. Every `None` means
/// "no constraint"; the default filter matches every hotel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelFilter {
    pub name_contains: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub rating_at_least: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub offset: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: HotelFilter,
    pub window: PageWindow,
}

/// Case folding used for name search, both for the stored `name_folded`
/// column and for the needle. Unicode-aware, unlike SQLite's `LOWER`.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

impl HotelFilter {
    pub fn is_empty(&self) -> bool {
        *self == HotelFilter::default()
    }

    /// Evaluates the filter against an in-memory record. Mirrors the SQL
    /// predicate.
    pub fn matches(&self, hotel: &Hotel) -> bool {
        if let Some(needle) = &self.name_contains {
            if !fold_name(&hotel.name).contains(&fold_name(needle)) {
                return false;
            }
        }
        if let Some(min) = self.price_min {
            if hotel.price_per_night < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if hotel.price_per_night > max {
                return false;
            }
        }
        if let Some(floor) = self.rating_at_least {
            if hotel.rating < floor {
                return false;
            }
        }
        true
    }
}

impl PageWindow {
    /// Window for a 1-based page. Page 0 is treated as page 1; there is no
    /// upper bound here.
    pub fn for_page(page: u32) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: u64::from(page - 1) * u64::from(PAGE_SIZE),
            limit: PAGE_SIZE,
        }
    }
}

/// Number of pages needed to show `total_count` rows; never less than one.
pub fn total_pages(total_count: i64) -> u32 {
    let limit = i64::from(PAGE_SIZE);
    let pages = (total_count.max(0) + limit - 1) / limit;
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

fn coerce_page(raw: Option<&str>) -> u32 {
    match parse_optional(raw) {
        Some(n) if n >= 1.0 => n.floor() as u32,
        _ => 1,
    }
}

pub fn compile(query: &HotelQuery) -> CompiledQuery {
    let name_contains = query
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let filter = HotelFilter {
        name_contains,
        price_min: parse_optional(query.price_min.as_deref()),
        price_max: parse_optional(query.price_max.as_deref()),
        rating_at_least: parse_optional(query.rating.as_deref()),
    };

    CompiledQuery {
        filter,
        window: PageWindow::for_page(coerce_page(query.page.as_deref())),
    }
}
