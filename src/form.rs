//! State of the create/edit recipe dialog. Created empty when the dialog
//! opens, mutated by manual entry, chip deletion, file selection, and voice
//! transcript append; reset on submit or cancel.

use std::path::PathBuf;

use crate::api::{ImageAttachment, Recipe, RecipeSubmission};

/// Which token list a commit or voice transcript targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Ingredients,
    Tags,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub title: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image: Option<ImageAttachment>,
    pub image_error: Option<String>,
}

impl RecipeForm {
    /// Pre-populate for editing. The existing image stays server-side; only
    /// a fresh selection is uploaded.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            tags: recipe.tags.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            image: None,
            image_error: None,
        }
    }

    pub fn tokens(&self, field: TokenField) -> &[String] {
        match field {
            TokenField::Ingredients => &self.ingredients,
            TokenField::Tags => &self.tags,
        }
    }

    fn tokens_mut(&mut self, field: TokenField) -> &mut Vec<String> {
        match field {
            TokenField::Ingredients => &mut self.ingredients,
            TokenField::Tags => &mut self.tags,
        }
    }

    /// Commit one manually typed token. Blank input is ignored; duplicates
    /// are allowed and insertion order is preserved.
    pub fn commit_token(&mut self, field: TokenField, input: &str) -> bool {
        let token = input.trim();
        if token.is_empty() {
            return false;
        }
        self.tokens_mut(field).push(token.to_string());
        true
    }

    /// Append recognised voice tokens, already split and trimmed.
    pub fn append_tokens(&mut self, field: TokenField, tokens: Vec<String>) {
        self.tokens_mut(field).extend(tokens);
    }

    pub fn remove_token(&mut self, field: TokenField, index: usize) {
        let list = self.tokens_mut(field);
        if index < list.len() {
            list.remove(index);
        }
    }

    /// Record a file selection. Anything whose content type is not `image/*`
    /// clears the previous image and leaves an error for the dialog to show;
    /// a later valid selection clears that error.
    pub fn select_image(&mut self, path: PathBuf, content_type: &str) {
        if content_type.starts_with("image/") {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();
            self.image = Some(ImageAttachment {
                path,
                content_type: content_type.to_string(),
                file_name,
            });
            self.image_error = None;
        } else {
            self.image = None;
            self.image_error = Some("Please choose a valid image file.".to_string());
        }
    }

    /// Local checks that must pass before any network call is made.
    pub fn validate_for_submit(&self) -> Result<(), String> {
        if self.ingredients.is_empty() {
            return Err("Please add at least one ingredient.".to_string());
        }
        if let Some(err) = &self.image_error {
            return Err(err.clone());
        }
        Ok(())
    }

    pub fn to_submission(&self) -> RecipeSubmission {
        RecipeSubmission {
            title: self.title.trim().to_string(),
            tags: self.tags.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
            image: self.image.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_trims_and_ignores_blank() {
        let mut form = RecipeForm::default();
        assert!(form.commit_token(TokenField::Ingredients, "  eggs  "));
        assert!(!form.commit_token(TokenField::Ingredients, "   "));
        assert_eq!(form.ingredients, vec!["eggs"]);
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        let mut form = RecipeForm::default();
        form.commit_token(TokenField::Tags, "quick");
        form.commit_token(TokenField::Tags, "dessert");
        form.commit_token(TokenField::Tags, "quick");
        assert_eq!(form.tags, vec!["quick", "dessert", "quick"]);
    }

    #[test]
    fn remove_by_index_leaves_others() {
        let mut form = RecipeForm::default();
        form.append_tokens(
            TokenField::Ingredients,
            vec!["a".into(), "b".into(), "c".into()],
        );
        form.remove_token(TokenField::Ingredients, 1);
        assert_eq!(form.ingredients, vec!["a", "c"]);
        // Out-of-range deletion is a no-op.
        form.remove_token(TokenField::Ingredients, 9);
        assert_eq!(form.ingredients, vec!["a", "c"]);
    }

    #[test]
    fn non_image_selection_sets_error_and_clears_file() {
        let mut form = RecipeForm::default();
        form.select_image(PathBuf::from("/tmp/photo.jpg"), "image/jpeg");
        assert!(form.image.is_some());
        assert!(form.image_error.is_none());

        form.select_image(PathBuf::from("/tmp/notes.txt"), "text/plain");
        assert!(form.image.is_none());
        assert!(form.image_error.is_some());

        // A subsequent valid selection clears the error.
        form.select_image(PathBuf::from("/tmp/photo.png"), "image/png");
        assert!(form.image.is_some());
        assert!(form.image_error.is_none());
    }

    #[test]
    fn submit_requires_at_least_one_ingredient() {
        let mut form = RecipeForm::default();
        assert!(form.validate_for_submit().is_err());
        form.commit_token(TokenField::Ingredients, "flour");
        assert!(form.validate_for_submit().is_ok());
    }

    #[test]
    fn pending_image_error_blocks_submit() {
        let mut form = RecipeForm::default();
        form.commit_token(TokenField::Ingredients, "flour");
        form.select_image(PathBuf::from("/tmp/notes.txt"), "text/plain");
        assert!(form.validate_for_submit().is_err());
    }

    #[test]
    fn from_recipe_prefills_everything_but_the_image() {
        let recipe = Recipe {
            id: "r1".into(),
            title: "Soup".into(),
            tags: vec!["dinner".into()],
            ingredients: vec!["water".into()],
            instructions: "Boil.".into(),
            image_url: Some("http://x/s.jpg".into()),
        };
        let form = RecipeForm::from_recipe(&recipe);
        assert_eq!(form.title, "Soup");
        assert_eq!(form.ingredients, vec!["water"]);
        assert!(form.image.is_none());
    }
}
