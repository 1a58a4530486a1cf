pub mod dashboard;
pub mod detail;
pub mod generate;
pub mod login;
pub mod recipe_form;
pub mod signup;

/// Handles to every widget the event handlers touch, attached to the app
/// state after construction.
pub struct Ui {
    pub window: libadwaita::ApplicationWindow,
    pub stack: gtk4::Stack,
    pub login: login::LoginWidgets,
    pub signup: signup::SignupWidgets,
    pub dashboard: dashboard::DashboardWidgets,
    pub create: recipe_form::RecipeFormWidgets,
    pub edit: recipe_form::RecipeFormWidgets,
    pub generate: generate::GenerateWidgets,
}
