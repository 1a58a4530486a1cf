//! Client-side filtering for the dashboard search box.

use crate::api::Recipe;

/// A term starting with `#` matches against the tag set (case-insensitive
/// substring); anything else matches against the title. A blank term
/// matches everything.
pub fn matches(recipe: &Recipe, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    if let Some(tag_term) = term.strip_prefix('#') {
        recipe
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(tag_term))
    } else {
        recipe.title.to_lowercase().contains(&term)
    }
}

pub fn filter<'a>(recipes: &'a [Recipe], term: &str) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| matches(r, term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, tags: &[&str]) -> Recipe {
        Recipe {
            id: "x".into(),
            title: title.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ingredients: vec![],
            instructions: String::new(),
            image_url: None,
        }
    }

    #[test]
    fn blank_term_matches_everything() {
        assert!(matches(&recipe("Anything", &[]), ""));
        assert!(matches(&recipe("Anything", &[]), "   "));
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let r = recipe("Chocolate Cake", &["dessert"]);
        assert!(matches(&r, "choc"));
        assert!(matches(&r, "CAKE"));
        assert!(!matches(&r, "pie"));
    }

    #[test]
    fn hash_term_matches_tags_only() {
        let tagged = recipe("Plain Title", &["Dessert", "quick"]);
        let untagged = recipe("dessert platter", &["savory"]);
        assert!(matches(&tagged, "#dessert"));
        assert!(matches(&tagged, "#DESS"));
        // Title containing the word is not enough when searching by tag.
        assert!(!matches(&untagged, "#dessert"));
    }

    #[test]
    fn hash_term_never_matches_recipes_without_tags() {
        assert!(!matches(&recipe("Untitled", &[]), "#dessert"));
    }

    #[test]
    fn filter_keeps_order() {
        let list = vec![
            recipe("Apple Pie", &["dessert"]),
            recipe("Beef Stew", &["dinner"]),
            recipe("Pecan Pie", &["dessert"]),
        ];
        let hits = filter(&list, "pie");
        assert_eq!(
            hits.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["Apple Pie", "Pecan Pie"]
        );
    }
}
