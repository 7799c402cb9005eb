//! Tournament listings: paging, name search and sorting.

use crate::models::Tournament;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 50;

/// Raw listing query as it arrives on the URL. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub page: Option<i64>,
    pub count: Option<i64>,
    pub sort_name: Option<String>,
    pub sort_size: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `asc` or `desc`; anything else means "don't sort on this key".
    fn parse(s: Option<&str>) -> Option<Self> {
        match s? {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// A listing query with defaults filled in and bounds applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    /// 1-based.
    pub page: usize,
    pub count: usize,
    pub sort_name: Option<SortOrder>,
    pub sort_size: Option<SortOrder>,
    pub search: Option<String>,
}

impl From<ListingQuery> for Listing {
    fn from(q: ListingQuery) -> Self {
        let page = match q.page {
            Some(p) if p > 0 => p as usize,
            _ => 1,
        };
        let count = match q.count {
            Some(c) if c > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
            Some(c) if c > 0 => c as usize,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self {
            page,
            count,
            sort_name: SortOrder::parse(q.sort_name.as_deref()),
            sort_size: SortOrder::parse(q.sort_size.as_deref()),
            search: q
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// One page of tournaments plus the total before paging.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentsPage {
    pub tournament_count: usize,
    pub tournaments: Vec<Tournament>,
}

/// Order and page `tournaments`. The input order is kept for ties.
///
/// Search (closest name first) ranks before the name sort, which ranks before the size sort.
pub fn list_tournaments(tournaments: Vec<Tournament>, listing: &Listing) -> TournamentsPage {
    let total = tournaments.len();
    let mut ranked: Vec<(usize, Tournament)> = tournaments
        .into_iter()
        .map(|t| {
            let distance = listing
                .search
                .as_deref()
                .map_or(0, |search| strsim::levenshtein(&t.name, search));
            (distance, t)
        })
        .collect();
    ranked.sort_by(|(da, a), (db, b)| {
        da.cmp(db)
            .then_with(|| {
                listing
                    .sort_name
                    .map_or(Ordering::Equal, |o| o.apply(a.name.cmp(&b.name)))
            })
            .then_with(|| {
                listing
                    .sort_size
                    .map_or(Ordering::Equal, |o| o.apply(a.size.cmp(&b.size)))
            })
    });
    let tournaments = ranked
        .into_iter()
        .map(|(_, t)| t)
        .skip((listing.page - 1).saturating_mul(listing.count))
        .take(listing.count)
        .collect();
    TournamentsPage {
        tournament_count: total,
        tournaments,
    }
}
