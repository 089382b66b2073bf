use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie in the catalog, owning a many-to-many relation to actors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Stable row identifier.
    pub id: i64,
    /// Movie title.
    pub title: String,
    /// Planned or actual release date.
    pub release_date: NaiveDate,
}

/// An actor in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable row identifier.
    pub id: i64,
    /// Actor name.
    pub name: String,
    /// Date of birth; age is derived from this at read time, never stored.
    pub birth_date: NaiveDate,
    /// Free-form gender value.
    pub gender: String,
}

impl Actor {
    /// Returns the actor's age in whole years as of the given date.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.birth_date.year();
        if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        age.max(0)
    }
}
