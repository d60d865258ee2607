//! Item catalog
//!
//! A daily entry is made of items. Each item has a kind, identified in the
//! database by its integer category. The catalog is fixed at compile time;
//! users only choose which kinds appear in their log form.

/// Kinds of item a daily log can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    /// Free-text description of the day
    Summary,
    /// Mood slider, 1 to 100
    Happiness,
    /// Where the user was that day
    Location,
}

/// Categories a freshly registered user starts with
pub const DEFAULT_CATEGORIES: [i64; 2] = [1, 2];

/// Slider bounds for [`ItemKind::Happiness`]
pub const HAPPINESS_MIN: i64 = 1;
pub const HAPPINESS_MAX: i64 = 100;

impl ItemKind {
    /// Every kind, in category order
    pub fn all() -> [ItemKind; 3] {
        [ItemKind::Summary, ItemKind::Happiness, ItemKind::Location]
    }

    pub fn category(self) -> i64 {
        match self {
            ItemKind::Summary => 1,
            ItemKind::Happiness => 2,
            ItemKind::Location => 3,
        }
    }

    pub fn from_category(category: i64) -> Option<ItemKind> {
        Self::all().into_iter().find(|kind| kind.category() == category)
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Summary => "Summary",
            ItemKind::Happiness => "Happiness",
            ItemKind::Location => "Location",
        }
    }

    /// Lowercase name, used as the form field key
    pub fn slug(self) -> &'static str {
        match self {
            ItemKind::Summary => "summary",
            ItemKind::Happiness => "happiness",
            ItemKind::Location => "location",
        }
    }

    pub fn from_slug(slug: &str) -> Option<ItemKind> {
        let slug = slug.trim();
        Self::all()
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(slug))
    }

    pub fn description(self) -> &'static str {
        match self {
            ItemKind::Summary => "Write as little or as much about your day as you'd like.",
            ItemKind::Happiness => "Use the slider to indicate your mood for that day.",
            ItemKind::Location => {
                "In case you are traveling, the location field can be used to remember where you were."
            }
        }
    }

    /// Check submitted content for this kind
    ///
    /// Empty content is always accepted. Happiness must otherwise be a whole
    /// number inside the slider range.
    pub fn validate_content(self, content: &str) -> Result<(), String> {
        match self {
            ItemKind::Happiness => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    return Ok(());
                }
                match trimmed.parse::<i64>() {
                    Ok(value) if (HAPPINESS_MIN..=HAPPINESS_MAX).contains(&value) => Ok(()),
                    _ => Err(format!(
                        "Happiness must be a number from {} to {}",
                        HAPPINESS_MIN, HAPPINESS_MAX
                    )),
                }
            }
            ItemKind::Summary | ItemKind::Location => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_round_trip_through_catalog() {
        for kind in ItemKind::all() {
            assert_eq!(ItemKind::from_category(kind.category()), Some(kind));
        }
        assert_eq!(ItemKind::from_category(0), None);
        assert_eq!(ItemKind::from_category(4), None);
    }

    #[test]
    fn test_all_is_in_category_order() {
        let categories: Vec<i64> = ItemKind::all().iter().map(|k| k.category()).collect();
        assert_eq!(categories, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_slug_ignores_case_and_whitespace() {
        assert_eq!(ItemKind::from_slug("Summary"), Some(ItemKind::Summary));
        assert_eq!(ItemKind::from_slug(" LOCATION "), Some(ItemKind::Location));
        assert_eq!(ItemKind::from_slug("gratitude"), None);
    }

    #[test]
    fn test_default_categories_are_summary_and_happiness() {
        let kinds: Vec<ItemKind> = DEFAULT_CATEGORIES
            .iter()
            .filter_map(|c| ItemKind::from_category(*c))
            .collect();
        assert_eq!(kinds, vec![ItemKind::Summary, ItemKind::Happiness]);
    }

    #[test]
    fn test_happiness_validation() {
        assert!(ItemKind::Happiness.validate_content("").is_ok());
        assert!(ItemKind::Happiness.validate_content("1").is_ok());
        assert!(ItemKind::Happiness.validate_content(" 100 ").is_ok());
        assert!(ItemKind::Happiness.validate_content("0").is_err());
        assert!(ItemKind::Happiness.validate_content("101").is_err());
        assert!(ItemKind::Happiness.validate_content("happy").is_err());
    }

    #[test]
    fn test_free_text_kinds_accept_anything() {
        assert!(ItemKind::Summary.validate_content("A long day ☀").is_ok());
        assert!(ItemKind::Location.validate_content("Paris, France").is_ok());
    }
}
