use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::api::Recipe;

/// Handles returned from building the dashboard page.
pub struct DashboardWidgets {
    pub root: gtk4::Box,
    pub create_button: gtk4::Button,
    pub generate_button: gtk4::Button,
    pub search_entry: gtk4::SearchEntry,
    pub my_tab: gtk4::ToggleButton,
    pub all_tab: gtk4::ToggleButton,
    pub spinner: gtk4::Spinner,
    pub error_label: gtk4::Label,
    pub list: gtk4::ListBox,
}

/// Build the dashboard page: action buttons, search, tabs, recipe list.
pub fn build_dashboard() -> DashboardWidgets {
    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    root.set_margin_start(16);
    root.set_margin_end(16);
    root.set_margin_top(12);
    root.set_margin_bottom(12);

    // Create / Generate button pair
    let actions = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    actions.set_halign(gtk4::Align::Center);
    actions.add_css_class("linked");

    let create_button = gtk4::Button::with_label("Create Recipe");
    create_button.add_css_class("suggested-action");
    actions.append(&create_button);

    let generate_button = gtk4::Button::with_label("Generate Recipe");
    actions.append(&generate_button);

    root.append(&actions);

    let search_entry = gtk4::SearchEntry::new();
    search_entry.set_placeholder_text(Some("Search recipes\u{2026} use #tag for tags"));
    search_entry.set_margin_top(12);
    root.append(&search_entry);

    // Tabs
    let tabs = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    tabs.set_halign(gtk4::Align::Center);
    tabs.set_margin_top(12);
    tabs.add_css_class("linked");

    let my_tab = gtk4::ToggleButton::with_label("My Recipes");
    my_tab.set_active(true);
    tabs.append(&my_tab);

    let all_tab = gtk4::ToggleButton::with_label("All Recipes");
    all_tab.set_group(Some(&my_tab));
    tabs.append(&all_tab);

    root.append(&tabs);

    let spinner = gtk4::Spinner::new();
    spinner.set_margin_top(16);
    spinner.set_visible(false);
    root.append(&spinner);

    let error_label = gtk4::Label::new(None);
    error_label.add_css_class("error");
    error_label.set_wrap(true);
    error_label.set_margin_top(8);
    root.append(&error_label);

    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::None);
    list.add_css_class("boxed-list");
    list.set_margin_top(12);

    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&list)
        .build();
    root.append(&scrolled);

    DashboardWidgets {
        root,
        create_button,
        generate_button,
        search_entry,
        my_tab,
        all_tab,
        spinner,
        error_label,
        list,
    }
}

/// Rebuild the list box from the filtered recipes.
pub fn render_list(
    widgets: &DashboardWidgets,
    recipes: &[Recipe],
    on_view: impl Fn(Recipe) + Clone + 'static,
    on_edit: impl Fn(Recipe) + Clone + 'static,
    on_delete: impl Fn(Recipe) + Clone + 'static,
) {
    while let Some(child) = widgets.list.first_child() {
        widgets.list.remove(&child);
    }

    if recipes.is_empty() {
        let empty = libadwaita::ActionRow::builder()
            .title("No recipes found")
            .build();
        widgets.list.append(&empty);
        return;
    }

    for recipe in recipes {
        let row = libadwaita::ActionRow::builder()
            .title(recipe.title.as_str())
            .activatable(true)
            .build();
        if !recipe.tags.is_empty() {
            row.set_subtitle(&recipe.tags.join(" \u{00b7} "));
        }

        let edit_btn = gtk4::Button::from_icon_name("document-edit-symbolic");
        edit_btn.set_valign(gtk4::Align::Center);
        edit_btn.set_tooltip_text(Some("Edit recipe"));
        edit_btn.add_css_class("flat");
        let edit_cb = on_edit.clone();
        let recipe_for_edit = recipe.clone();
        edit_btn.connect_clicked(move |_| edit_cb(recipe_for_edit.clone()));
        row.add_suffix(&edit_btn);

        let delete_btn = gtk4::Button::from_icon_name("user-trash-symbolic");
        delete_btn.set_valign(gtk4::Align::Center);
        delete_btn.set_tooltip_text(Some("Delete recipe"));
        delete_btn.add_css_class("flat");
        let delete_cb = on_delete.clone();
        let recipe_for_delete = recipe.clone();
        delete_btn.connect_clicked(move |_| delete_cb(recipe_for_delete.clone()));
        row.add_suffix(&delete_btn);

        let view_cb = on_view.clone();
        let recipe_for_view = recipe.clone();
        row.connect_activated(move |_| view_cb(recipe_for_view.clone()));

        widgets.list.append(&row);
    }
}
