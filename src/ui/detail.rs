//! Read-only recipe detail view, shown as a transient window.

use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::api::Recipe;

/// Present the detail window. When the recipe has a photo, the returned
/// `Picture` is a placeholder the caller fills in once the bytes arrive.
pub fn show_detail(
    parent: &libadwaita::ApplicationWindow,
    recipe: &Recipe,
) -> Option<gtk4::Picture> {
    let body = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    body.set_margin_start(16);
    body.set_margin_end(16);
    body.set_margin_top(12);
    body.set_margin_bottom(16);

    let picture = recipe.image_url.as_ref().map(|_| {
        let picture = gtk4::Picture::new();
        picture.set_content_fit(gtk4::ContentFit::Cover);
        picture.set_height_request(180);
        picture.add_css_class("card");
        // Hidden until the photo has been fetched and decoded.
        picture.set_visible(false);
        body.append(&picture);
        picture
    });

    if !recipe.tags.is_empty() {
        let tags = gtk4::Label::new(Some(&format!(
            "#{}",
            recipe.tags.join("  #")
        )));
        tags.set_xalign(0.0);
        tags.add_css_class("dim-label");
        tags.set_wrap(true);
        body.append(&tags);
    }

    let ingredients_heading = gtk4::Label::new(Some("Ingredients"));
    ingredients_heading.set_xalign(0.0);
    ingredients_heading.add_css_class("heading");
    body.append(&ingredients_heading);

    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::None);
    list.add_css_class("boxed-list");
    for ingredient in &recipe.ingredients {
        let row = libadwaita::ActionRow::builder().title(ingredient.as_str()).build();
        list.append(&row);
    }
    body.append(&list);

    let instructions_heading = gtk4::Label::new(Some("Instructions"));
    instructions_heading.set_xalign(0.0);
    instructions_heading.add_css_class("heading");
    body.append(&instructions_heading);

    let instructions = gtk4::Label::new(Some(&recipe.instructions));
    instructions.set_xalign(0.0);
    instructions.set_wrap(true);
    instructions.set_selectable(true);
    body.append(&instructions);

    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&body)
        .build();

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = libadwaita::HeaderBar::builder()
        .title_widget(&libadwaita::WindowTitle::new(&recipe.title, ""))
        .build();
    content.append(&header);
    content.append(&scrolled);

    let window = libadwaita::Window::builder()
        .default_width(420)
        .default_height(520)
        .modal(true)
        .transient_for(parent)
        .content(&content)
        .build();
    window.present();

    picture
}
