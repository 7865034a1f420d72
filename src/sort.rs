//! Result ordering and discount presets.
//!
//! # Sort Options
//!
//! | Option | Key | Direction |
//! |--------|-----|-----------|
//! | **NameAsc** (default) | `name` | A → Z |
//! | **NameDesc** | `name` | Z → A |
//! | **DiscountDesc** | `discount_percentage` | high → low |
//! | **DiscountAsc** | `discount_percentage` | low → high |
//! | **LocationAsc** | `place` | A → Z |
//!
//! Strings compare by byte order, so `"ABC Company"` sorts before
//! `"Amsterdam Tech"`. All sorts are stable: equal keys keep the order the
//! repository returned them in.

use crate::employer::Employer;
use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::str::FromStr;

/// Ordering applied to search results.
///
/// ```
/// use employer_search::SortOption;
///
/// let option: SortOption = "discount_desc".parse().unwrap();
/// assert_eq!(option, SortOption::DiscountDesc);
/// assert_eq!(option.to_string(), "Discount (High to Low)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    #[default]
    NameAsc,
    NameDesc,
    DiscountDesc,
    DiscountAsc,
    LocationAsc,
}

impl SortOption {
    /// Every option, in menu order.
    pub const ALL: [SortOption; 5] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::DiscountDesc,
        SortOption::DiscountAsc,
        SortOption::LocationAsc,
    ];

    /// Human-readable label, e.g. `"Name (A-Z)"`.
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::DiscountDesc => "Discount (High to Low)",
            SortOption::DiscountAsc => "Discount (Low to High)",
            SortOption::LocationAsc => "Location (A-Z)",
        }
    }

    /// Short machine-readable code, e.g. `"name_asc"`.
    pub fn code(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "name_asc",
            SortOption::NameDesc => "name_desc",
            SortOption::DiscountDesc => "discount_desc",
            SortOption::DiscountAsc => "discount_asc",
            SortOption::LocationAsc => "location_asc",
        }
    }

    /// Stable in-place sort of `employers`.
    pub fn sort(&self, employers: &mut [Employer]) {
        match self {
            SortOption::NameAsc => employers.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOption::NameDesc => employers.sort_by(|a, b| b.name.cmp(&a.name)),
            SortOption::DiscountDesc => employers.sort_by_key(|e| Reverse(e.discount_percentage)),
            SortOption::DiscountAsc => employers.sort_by_key(|e| e.discount_percentage),
            SortOption::LocationAsc => employers.sort_by(|a, b| a.place.cmp(&b.place)),
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = Error;

    /// Accepts a label (`"Name (A-Z)"`) or a code (`"name_asc"`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        SortOption::ALL
            .into_iter()
            .find(|option| option.code().eq_ignore_ascii_case(s) || option.label() == s)
            .ok_or_else(|| Error::ConfigError(format!("Unknown sort option: {:?}", s)))
    }
}

/// Minimum-discount thresholds offered as filter chips (`None` = all).
pub const DISCOUNT_PRESETS: [Option<u8>; 5] = [None, Some(5), Some(10), Some(15), Some(20)];
