use std::cmp::Ordering;

use crate::models::holding::Holding;
use crate::models::view::{SortDirection, SortKey, ViewOptions};

/// Produces the holdings table: filter by search text and asset class,
/// then a stable sort on the selected key.
///
/// Pure and deterministic; holdings with equal keys keep their incoming
/// relative order in both directions.
pub struct ViewService;

impl ViewService {
    pub fn new() -> Self {
        Self
    }

    /// Filter then sort.
    pub fn apply<'a, I>(&self, holdings: I, options: &ViewOptions) -> Vec<&'a Holding>
    where
        I: IntoIterator<Item = &'a Holding>,
    {
        let mut view = self.filter(holdings, options);
        self.sort(&mut view, options.sort_key, options.direction);
        view
    }

    pub fn filter<'a, I>(&self, holdings: I, options: &ViewOptions) -> Vec<&'a Holding>
    where
        I: IntoIterator<Item = &'a Holding>,
    {
        let needle = options.search_text.to_lowercase();
        holdings
            .into_iter()
            .filter(|h| {
                let matches_search = h.ticker.to_lowercase().contains(&needle)
                    || h.display_name.to_lowercase().contains(&needle);
                matches_search && options.asset_class.matches(h.asset_class)
            })
            .collect()
    }

    pub fn sort(&self, holdings: &mut [&Holding], key: SortKey, direction: SortDirection) {
        holdings.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

fn compare(a: &Holding, b: &Holding, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.next_payment_date.cmp(&b.next_payment_date),
        SortKey::Ticker => compare_tickers(&a.ticker, &b.ticker),
        SortKey::Yield => a.yield_percent.total_cmp(&b.yield_percent),
        SortKey::Value => a.total_value().total_cmp(&b.total_value()),
    }
}

/// Case-insensitive first so "abcd3" sorts next to "ABCD4", exact text as
/// tie-break.
fn compare_tickers(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
