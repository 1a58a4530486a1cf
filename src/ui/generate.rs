//! The generate-recipe dialog: an ingredient list (typed or dictated) sent
//! to the server's generation endpoint.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::form::{RecipeForm, TokenField};

pub struct GenerateWidgets {
    pub window: libadwaita::Window,
    pub entry: gtk4::Entry,
    pub chips: gtk4::FlowBox,
    pub mic: gtk4::Button,
    pub voice_status: gtk4::Label,
    pub error_label: gtk4::Label,
    pub submit: gtk4::Button,
    pub cancel: gtk4::Button,
    /// Only the ingredient list of the form is used here.
    pub form: Rc<RefCell<RecipeForm>>,
}

pub fn build_generate() -> GenerateWidgets {
    let form = Rc::new(RefCell::new(RecipeForm::default()));

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);

    let header = libadwaita::HeaderBar::builder()
        .title_widget(&libadwaita::WindowTitle::new("Generate Recipe", ""))
        .show_end_title_buttons(false)
        .build();
    let cancel = gtk4::Button::with_label("Cancel");
    header.pack_start(&cancel);
    let submit = gtk4::Button::with_label("Generate");
    submit.add_css_class("suggested-action");
    header.pack_end(&submit);
    content.append(&header);

    let body = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    body.set_margin_start(16);
    body.set_margin_end(16);
    body.set_margin_top(12);
    body.set_margin_bottom(16);

    let hint = gtk4::Label::new(Some("List the ingredients you have on hand."));
    hint.set_xalign(0.0);
    hint.add_css_class("dim-label");
    body.append(&hint);

    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    let entry = gtk4::Entry::builder()
        .placeholder_text("Add an ingredient and press Enter")
        .hexpand(true)
        .build();
    row.append(&entry);

    let mic = gtk4::Button::from_icon_name("audio-input-microphone-symbolic");
    mic.set_tooltip_text(Some("Dictate"));
    row.append(&mic);
    body.append(&row);

    let chips = gtk4::FlowBox::new();
    chips.set_selection_mode(gtk4::SelectionMode::None);
    chips.set_column_spacing(6);
    chips.set_row_spacing(6);
    chips.set_max_children_per_line(8);
    body.append(&chips);

    let voice_status = gtk4::Label::new(None);
    voice_status.add_css_class("dim-label");
    voice_status.set_xalign(0.0);
    body.append(&voice_status);

    let error_label = gtk4::Label::new(None);
    error_label.add_css_class("error");
    error_label.set_wrap(true);
    body.append(&error_label);

    content.append(&body);

    let window = libadwaita::Window::builder()
        .default_width(380)
        .default_height(360)
        .modal(true)
        .hide_on_close(true)
        .content(&content)
        .build();

    {
        let form = form.clone();
        let chips = chips.clone();
        entry.connect_activate(move |entry| {
            if form.borrow_mut().commit_token(TokenField::Ingredients, &entry.text()) {
                entry.set_text("");
                super::recipe_form::render_chips(&chips, &form, TokenField::Ingredients);
            }
        });
    }

    GenerateWidgets {
        window,
        entry,
        chips,
        mic,
        voice_status,
        error_label,
        submit,
        cancel,
        form,
    }
}

/// Re-render the ingredient chips from the form state.
pub fn refresh_chips(widgets: &GenerateWidgets) {
    super::recipe_form::render_chips(&widgets.chips, &widgets.form, TokenField::Ingredients);
}
