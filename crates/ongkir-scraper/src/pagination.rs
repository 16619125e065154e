//! Cartesian product of origin × destination candidates and its page window.
//!
//! Combinations are ordered origin-major: every destination for the first
//! origin, then every destination for the second origin, and so on. Page
//! contents are therefore stable across repeated calls with the same inputs.
//!
//! ## Normalization
//!
//! | Input | Result |
//! |-------|--------|
//! | `page` absent, non-numeric, or `< 1` | `1` |
//! | `per_page` absent or `< 0` | `10` |
//! | `per_page == 0` or non-numeric | everything on a single page |

use ongkir_core::{Combination, Location, Pagination};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 10;

/// Normalized page parameters.
///
/// `per_page == 0` is the "return everything" sentinel; it is resolved
/// against the actual total by [`generate_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Normalizes raw query-string values.
    #[must_use]
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = parse_int(page)
            .and_then(|p| usize::try_from(p).ok())
            .map_or(DEFAULT_PAGE, |p| p.max(1));

        let per_page = match per_page.map(str::trim).filter(|s| !s.is_empty()) {
            None => DEFAULT_PER_PAGE,
            Some(raw) => raw
                .parse::<i64>()
                .map_or(0, |p| usize::try_from(p).unwrap_or(DEFAULT_PER_PAGE)),
        };

        Self { page, per_page }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}

/// One page of combinations plus the totals it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub combinations: Vec<Combination>,
    pub pagination: Pagination,
}

/// Lazily yields the full product in origin-major order.
pub fn combinations<'a>(
    origins: &'a [Location],
    destinations: &'a [Location],
) -> impl Iterator<Item = Combination> + 'a {
    origins.iter().flat_map(move |origin| {
        destinations.iter().map(move |destination| Combination {
            origin: origin.clone(),
            destination: destination.clone(),
        })
    })
}

/// Builds the requested page of the origin × destination product.
///
/// A page past the end yields an empty slice with the true totals. With no
/// candidates on either side `total_pages` is `0`.
#[must_use]
pub fn generate_page(
    origins: &[Location],
    destinations: &[Location],
    request: PageRequest,
) -> Page {
    let total_items = origins.len().saturating_mul(destinations.len());
    let page = request.page.max(1);
    let per_page = if request.per_page == 0 {
        total_items
    } else {
        request.per_page
    };

    let total_pages = if per_page == 0 {
        0
    } else {
        total_items.div_ceil(per_page)
    };

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    let combinations = combinations(origins, destinations)
        .skip(start)
        .take(end - start)
        .collect();

    Page {
        combinations,
        pagination: Pagination {
            page,
            per_page,
            total_pages,
            total_items,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locs(codes: &[&str]) -> Vec<Location> {
        codes
            .iter()
            .map(|c| Location::new(*c, format!("Label {c}")))
            .collect()
    }

    fn pairs(page: &Page) -> Vec<(String, String)> {
        page.combinations
            .iter()
            .map(|c| (c.origin.code.clone(), c.destination.code.clone()))
            .collect()
    }

    fn req(page: usize, per_page: usize) -> PageRequest {
        PageRequest { page, per_page }
    }

    #[test]
    fn two_by_two_fits_in_default_page() {
        let page = generate_page(&locs(&["A", "B"]), &locs(&["X", "Y"]), req(1, 10));
        assert_eq!(page.pagination.total_items, 4);
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.per_page, 10);
        assert_eq!(
            pairs(&page),
            vec![
                ("A".into(), "X".into()),
                ("A".into(), "Y".into()),
                ("B".into(), "X".into()),
                ("B".into(), "Y".into()),
            ]
        );
    }

    #[test]
    fn second_page_of_three_by_one_holds_third_item() {
        let page = generate_page(&locs(&["A", "B", "C"]), &locs(&["X"]), req(2, 2));
        assert_eq!(pairs(&page), vec![("C".into(), "X".into())]);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.total_items, 3);
        assert_eq!(page.pagination.page, 2);
    }

    #[test]
    fn per_page_zero_returns_everything_on_one_page() {
        let page = generate_page(&locs(&["A", "B", "C"]), &locs(&["X", "Y"]), req(1, 0));
        assert_eq!(page.combinations.len(), 6);
        assert_eq!(page.pagination.per_page, 6);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn page_past_the_end_is_empty_with_true_totals() {
        let page = generate_page(&locs(&["A", "B"]), &locs(&["X", "Y"]), req(5, 3));
        assert!(page.combinations.is_empty());
        assert_eq!(page.pagination.total_items, 4);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.page, 5);
    }

    #[test]
    fn empty_candidates_do_not_divide_by_zero() {
        let page = generate_page(&[], &locs(&["X"]), req(1, 0));
        assert!(page.combinations.is_empty());
        assert_eq!(page.pagination.total_items, 0);
        assert_eq!(page.pagination.total_pages, 0);
        assert_eq!(page.pagination.per_page, 0);

        let page = generate_page(&locs(&["A"]), &[], req(1, 10));
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn pages_partition_the_product_in_origin_major_order() {
        let origins = locs(&["A", "B", "C", "D"]);
        let destinations = locs(&["X", "Y", "Z"]);
        let full: Vec<Combination> = combinations(&origins, &destinations).collect();

        for per_page in 1..=13 {
            let first = generate_page(&origins, &destinations, req(1, per_page));
            let mut stitched = Vec::new();
            for page_no in 1..=first.pagination.total_pages {
                let page = generate_page(&origins, &destinations, req(page_no, per_page));
                assert!(page.combinations.len() <= per_page);
                stitched.extend(page.combinations);
            }
            assert_eq!(stitched, full, "per_page = {per_page}");
            assert_eq!(first.pagination.total_items, 12);
        }
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = generate_page(&locs(&["A"]), &locs(&["X"]), req(usize::MAX, usize::MAX));
        assert!(page.combinations.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn from_query_defaults_when_absent() {
        assert_eq!(PageRequest::from_query(None, None), PageRequest::default());
    }

    #[test]
    fn from_query_clamps_page_below_one() {
        assert_eq!(PageRequest::from_query(Some("0"), None).page, 1);
        assert_eq!(PageRequest::from_query(Some("-3"), None).page, 1);
    }

    #[test]
    fn from_query_non_numeric_page_falls_back_to_one() {
        assert_eq!(PageRequest::from_query(Some("abc"), None), PageRequest::default());
    }

    #[test]
    fn from_query_non_numeric_per_page_means_everything() {
        assert_eq!(PageRequest::from_query(None, Some("lots")), req(1, 0));

        let page = generate_page(
            &locs(&["A", "B", "C", "D"]),
            &locs(&["X", "Y", "Z"]),
            PageRequest::from_query(None, Some("lots")),
        );
        assert_eq!(page.combinations.len(), 12);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn from_query_empty_per_page_uses_default() {
        assert_eq!(PageRequest::from_query(None, Some("")).per_page, 10);
    }

    #[test]
    fn from_query_negative_per_page_uses_default() {
        assert_eq!(PageRequest::from_query(None, Some("-1")).per_page, 10);
    }

    #[test]
    fn from_query_keeps_zero_per_page_sentinel() {
        assert_eq!(PageRequest::from_query(Some("2"), Some("0")), req(2, 0));
    }
}
