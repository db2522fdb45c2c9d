use crate::error::{ErrorType, IntoResult};
use crate::model::Dataset;
use crate::pipeline::{distinct_subcategories, filter_by_category, filter_by_subcategories};
use crate::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A chosen category and the chosen sub-categories within it.
///
/// The sub-category `domain` is always derived from the dataset for the current category, and the
/// chosen sub-categories are always a subset of it. Changing the category recomputes the domain
/// and resets the choice to the whole domain.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Selection {
    category: String,
    domain: Vec<String>,
    sub_categories: Vec<String>,
}

impl Selection {
    /// Selects `category` with all of its sub-categories. A category that does not occur in
    /// `dataset` gives an empty domain, and so an empty selection.
    pub fn new(dataset: &Dataset, category: impl Into<String>) -> Self {
        let category = category.into();
        let domain = distinct_subcategories(&filter_by_category(dataset, &category));
        debug!(
            "Category '{category}' has {} sub-categories",
            domain.len()
        );
        Self {
            category,
            sub_categories: domain.clone(),
            domain,
        }
    }

    /// Selects `category` and then narrows it to `sub_categories`. See `select`.
    pub fn with_sub_categories<S, I>(
        dataset: &Dataset,
        category: impl Into<String>,
        sub_categories: I,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut selection = Self::new(dataset, category);
        selection.select(sub_categories)?;
        Ok(selection)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The sub-categories that exist under the current category, in first-seen order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The chosen sub-categories, in domain order.
    pub fn sub_categories(&self) -> &[String] {
        &self.sub_categories
    }

    /// True when every sub-category of the category is chosen.
    pub fn is_all(&self) -> bool {
        self.sub_categories.len() == self.domain.len()
    }

    /// Switches to another category, recomputing the domain from `dataset` and choosing all of it.
    pub fn set_category(&mut self, dataset: &Dataset, category: impl Into<String>) {
        *self = Self::new(dataset, category);
    }

    /// Replaces the chosen sub-categories. An empty iterator is allowed and selects nothing.
    ///
    /// # Errors
    /// `ErrorType::Selection` if any name is not in the domain. The selection is left unchanged.
    pub fn select<S, I>(&mut self, sub_categories: I) -> Result<()>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let requested: Vec<String> = sub_categories
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let unknown: Vec<&str> = requested
            .iter()
            .filter(|s| !self.domain.contains(*s))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(anyhow!(
                "Sub-categories {:?} do not belong to category '{}', choose from {:?}",
                unknown,
                self.category,
                self.domain
            ))
            .pub_result(ErrorType::Selection);
        }
        self.sub_categories = self
            .domain
            .iter()
            .filter(|d| requested.contains(*d))
            .cloned()
            .collect();
        Ok(())
    }

    /// The records of `dataset` that fall inside this selection.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        filter_by_subcategories(
            &filter_by_category(dataset, &self.category),
            &self.sub_categories,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_dataset;

    #[test]
    fn test_new_selects_whole_domain() {
        let dataset = sample_dataset();
        let selection = Selection::new(&dataset, "Furniture");
        assert_eq!(selection.domain(), &["Bookcases", "Chairs", "Tables"]);
        assert_eq!(selection.sub_categories(), selection.domain());
        assert!(selection.is_all());
        assert_eq!(selection.apply(&dataset), filter_by_category(&dataset, "Furniture"));
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let dataset = sample_dataset();
        let selection = Selection::new(&dataset, "Toys");
        assert!(selection.domain().is_empty());
        assert!(selection.apply(&dataset).is_empty());
    }

    #[test]
    fn test_select_subset_keeps_domain_order() {
        let dataset = sample_dataset();
        let selection =
            Selection::with_sub_categories(&dataset, "Furniture", ["Tables", "Bookcases"]).unwrap();
        assert_eq!(selection.sub_categories(), &["Bookcases", "Tables"]);
        assert!(!selection.is_all());
        let filtered = selection.apply(&dataset);
        assert!(filtered
            .iter()
            .all(|r| r.sub_category() == "Bookcases" || r.sub_category() == "Tables"));
    }

    #[test]
    fn test_select_outside_domain_is_error() {
        let dataset = sample_dataset();
        let mut selection = Selection::new(&dataset, "Furniture");
        let err = selection.select(["Chairs", "Phones"]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Selection);
        assert!(err.to_string().contains("Phones"));
        // unchanged
        assert!(selection.is_all());
    }

    #[test]
    fn test_select_nothing() {
        let dataset = sample_dataset();
        let mut selection = Selection::new(&dataset, "Furniture");
        selection.select(Vec::<String>::new()).unwrap();
        assert!(selection.sub_categories().is_empty());
        assert!(selection.apply(&dataset).is_empty());
    }

    #[test]
    fn test_set_category_resets_domain() {
        let dataset = sample_dataset();
        let mut selection =
            Selection::with_sub_categories(&dataset, "Furniture", ["Chairs"]).unwrap();
        selection.set_category(&dataset, "Technology");
        assert_eq!(selection.category(), "Technology");
        assert_eq!(selection.domain(), &["Phones", "Accessories"]);
        assert_eq!(selection.sub_categories(), &["Phones", "Accessories"]);
    }
}
