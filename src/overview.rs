//! Feedback overview: sorted, filtered projection of rated conversations
//!
//! A pure read model; recomputed from each store snapshot and never writes
//! back.

use crate::store::{Conversation, Rating};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Sort and filter controls of the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub rating_filter: Option<Rating>,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            sort_field: SortField::Date,
            sort_order: SortOrder::Descending,
            rating_filter: None,
        }
    }
}

impl Overview {
    /// Same field flips the order; a new field starts descending
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Descending;
        }
    }

    /// Picking the active filter again clears it
    pub fn toggle_rating_filter(&mut self, rating: Rating) {
        self.rating_filter = if self.rating_filter == Some(rating) {
            None
        } else {
            Some(rating)
        };
    }

    pub fn set_rating_filter(&mut self, rating: Option<Rating>) {
        self.rating_filter = rating;
    }

    /// Rated conversations passing the filter, stably sorted
    pub fn project<'a>(&self, conversations: &'a [Conversation]) -> Vec<&'a Conversation> {
        let mut rows: Vec<&Conversation> = conversations
            .iter()
            .filter(|c| c.rating.is_some())
            .filter(|c| self.rating_filter.map_or(true, |r| c.rating == Some(r)))
            .collect();

        // sort_by is stable, so ties keep input order
        rows.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        rows
    }

    fn compare(&self, a: &Conversation, b: &Conversation) -> Ordering {
        match self.sort_field {
            SortField::Date => a.timestamp.cmp(&b.timestamp),
            SortField::Rating => a.rating.cmp(&b.rating),
        }
    }
}
