//! The create/edit recipe dialog. Both dialogs are instances of the same
//! widget set; each owns its own `RecipeForm` state.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gio;
use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::form::{RecipeForm, TokenField};

pub struct RecipeFormWidgets {
    pub window: libadwaita::Window,
    pub title_row: libadwaita::EntryRow,
    pub ingredient_entry: gtk4::Entry,
    pub ingredient_chips: gtk4::FlowBox,
    pub mic_ingredients: gtk4::Button,
    pub tag_entry: gtk4::Entry,
    pub tag_chips: gtk4::FlowBox,
    pub mic_tags: gtk4::Button,
    pub instructions: gtk4::TextView,
    pub image_button: gtk4::Button,
    pub image_label: gtk4::Label,
    pub image_error: gtk4::Label,
    pub voice_status: gtk4::Label,
    pub error_label: gtk4::Label,
    pub submit: gtk4::Button,
    pub cancel: gtk4::Button,
    pub form: Rc<RefCell<RecipeForm>>,
}

/// Build one recipe dialog. Text inputs are kept in sync with the form
/// state here; submission, mic presses, and close handling are wired in
/// `main`.
pub fn build_recipe_form(heading: &str, submit_label: &str) -> RecipeFormWidgets {
    let form = Rc::new(RefCell::new(RecipeForm::default()));

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);

    let header = libadwaita::HeaderBar::builder()
        .title_widget(&libadwaita::WindowTitle::new(heading, ""))
        .show_end_title_buttons(false)
        .build();
    let cancel = gtk4::Button::with_label("Cancel");
    header.pack_start(&cancel);
    let submit = gtk4::Button::with_label(submit_label);
    submit.add_css_class("suggested-action");
    header.pack_end(&submit);
    content.append(&header);

    let body = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    body.set_margin_start(16);
    body.set_margin_end(16);
    body.set_margin_top(12);
    body.set_margin_bottom(16);

    let group = libadwaita::PreferencesGroup::new();
    let title_row = libadwaita::EntryRow::builder().title("Title").build();
    group.add(&title_row);
    body.append(&group);

    let (ingredient_entry, ingredient_chips, mic_ingredients) =
        token_section(&body, "Ingredients", "Add an ingredient and press Enter");
    let (tag_entry, tag_chips, mic_tags) = token_section(&body, "Tags", "Add a tag and press Enter");

    let instructions_label = gtk4::Label::new(Some("Instructions"));
    instructions_label.set_xalign(0.0);
    instructions_label.add_css_class("heading");
    body.append(&instructions_label);

    let instructions = gtk4::TextView::new();
    instructions.set_wrap_mode(gtk4::WrapMode::WordChar);
    let instructions_frame = gtk4::ScrolledWindow::builder()
        .min_content_height(100)
        .child(&instructions)
        .build();
    instructions_frame.add_css_class("card");
    body.append(&instructions_frame);

    let image_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let image_button = gtk4::Button::with_label("Choose Image\u{2026}");
    image_box.append(&image_button);
    let image_label = gtk4::Label::new(Some("No image selected"));
    image_label.add_css_class("dim-label");
    image_label.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);
    image_box.append(&image_label);
    body.append(&image_box);

    let image_error = gtk4::Label::new(None);
    image_error.add_css_class("error");
    image_error.add_css_class("caption");
    image_error.set_xalign(0.0);
    body.append(&image_error);

    let voice_status = gtk4::Label::new(None);
    voice_status.add_css_class("dim-label");
    voice_status.set_xalign(0.0);
    body.append(&voice_status);

    let error_label = gtk4::Label::new(None);
    error_label.add_css_class("error");
    error_label.set_wrap(true);
    body.append(&error_label);

    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&body)
        .build();
    content.append(&scrolled);

    let window = libadwaita::Window::builder()
        .default_width(420)
        .default_height(560)
        .modal(true)
        .hide_on_close(true)
        .content(&content)
        .build();

    let widgets = RecipeFormWidgets {
        window,
        title_row,
        ingredient_entry,
        ingredient_chips,
        mic_ingredients,
        tag_entry,
        tag_chips,
        mic_tags,
        instructions,
        image_button,
        image_label,
        image_error,
        voice_status,
        error_label,
        submit,
        cancel,
        form,
    };
    wire_inputs(&widgets);
    widgets
}

fn token_section(
    parent: &gtk4::Box,
    heading: &str,
    placeholder: &str,
) -> (gtk4::Entry, gtk4::FlowBox, gtk4::Button) {
    let label = gtk4::Label::new(Some(heading));
    label.set_xalign(0.0);
    label.add_css_class("heading");
    parent.append(&label);

    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    let entry = gtk4::Entry::builder()
        .placeholder_text(placeholder)
        .hexpand(true)
        .build();
    row.append(&entry);

    // A plain button: the session toggles in the voice machine, and the
    // dialog's status line shows whether it is listening.
    let mic = gtk4::Button::from_icon_name("audio-input-microphone-symbolic");
    mic.set_tooltip_text(Some("Dictate"));
    row.append(&mic);
    parent.append(&row);

    let chips = gtk4::FlowBox::new();
    chips.set_selection_mode(gtk4::SelectionMode::None);
    chips.set_column_spacing(6);
    chips.set_row_spacing(6);
    chips.set_max_children_per_line(8);
    parent.append(&chips);

    (entry, chips, mic)
}

/// Connect text inputs to the form state and the token entries to chip
/// commits.
fn wire_inputs(widgets: &RecipeFormWidgets) {
    {
        let form = widgets.form.clone();
        widgets.title_row.connect_changed(move |row| {
            form.borrow_mut().title = row.text().to_string();
        });
    }
    {
        let form = widgets.form.clone();
        widgets.instructions.buffer().connect_changed(move |buffer| {
            let (start, end) = buffer.bounds();
            form.borrow_mut().instructions = buffer.text(&start, &end, false).to_string();
        });
    }
    {
        let form = widgets.form.clone();
        let chips = widgets.ingredient_chips.clone();
        widgets.ingredient_entry.connect_activate(move |entry| {
            if form.borrow_mut().commit_token(TokenField::Ingredients, &entry.text()) {
                entry.set_text("");
                render_chips(&chips, &form, TokenField::Ingredients);
            }
        });
    }
    {
        let form = widgets.form.clone();
        let chips = widgets.tag_chips.clone();
        widgets.tag_entry.connect_activate(move |entry| {
            if form.borrow_mut().commit_token(TokenField::Tags, &entry.text()) {
                entry.set_text("");
                render_chips(&chips, &form, TokenField::Tags);
            }
        });
    }
    {
        let form = widgets.form.clone();
        let window = widgets.window.clone();
        let image_label = widgets.image_label.clone();
        let image_error = widgets.image_error.clone();
        widgets.image_button.connect_clicked(move |_| {
            pick_image(&window, &form, &image_label, &image_error);
        });
    }
}

fn pick_image(
    window: &libadwaita::Window,
    form: &Rc<RefCell<RecipeForm>>,
    image_label: &gtk4::Label,
    image_error: &gtk4::Label,
) {
    let filter = gtk4::FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type("image/*");
    let filters = gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&filter);

    let dialog = gtk4::FileDialog::builder()
        .title("Choose Image")
        .default_filter(&filter)
        .filters(&filters)
        .build();

    let form = form.clone();
    let image_label = image_label.clone();
    let image_error = image_error.clone();
    dialog.open(Some(window), None::<&gio::Cancellable>, move |result| {
        let Ok(file) = result else { return };
        let Some(path) = file.path() else { return };
        let content_type = file
            .query_info(
                "standard::content-type",
                gio::FileQueryInfoFlags::NONE,
                None::<&gio::Cancellable>,
            )
            .ok()
            .and_then(|info| info.content_type())
            .map(|ct| ct.to_string())
            .unwrap_or_default();
        let mut f = form.borrow_mut();
        f.select_image(path, &content_type);
        match (&f.image, &f.image_error) {
            (Some(image), _) => {
                image_label.set_text(&image.file_name);
                image_error.set_text("");
            }
            (None, Some(err)) => {
                image_label.set_text("No image selected");
                image_error.set_text(err);
            }
            (None, None) => {
                image_label.set_text("No image selected");
                image_error.set_text("");
            }
        }
    });
}

/// Push the form's text fields into the input widgets. Used after
/// prefilling for edit and after reset.
pub fn sync_inputs(widgets: &RecipeFormWidgets) {
    let (title, instructions, image_name, image_err) = {
        let form = widgets.form.borrow();
        (
            form.title.clone(),
            form.instructions.clone(),
            form.image.as_ref().map(|i| i.file_name.clone()),
            form.image_error.clone(),
        )
    };
    widgets.title_row.set_text(&title);
    widgets.instructions.buffer().set_text(&instructions);
    widgets.ingredient_entry.set_text("");
    widgets.tag_entry.set_text("");
    widgets
        .image_label
        .set_text(image_name.as_deref().unwrap_or("No image selected"));
    widgets.image_error.set_text(image_err.as_deref().unwrap_or(""));
}

/// Re-render both chip rows from the form state.
pub fn refresh_all_chips(widgets: &RecipeFormWidgets) {
    render_chips(&widgets.ingredient_chips, &widgets.form, TokenField::Ingredients);
    render_chips(&widgets.tag_chips, &widgets.form, TokenField::Tags);
}

/// Rebuild one chip row. Each chip carries a close button that removes the
/// token at its index and re-renders the row.
pub(super) fn render_chips(
    flow: &gtk4::FlowBox,
    form: &Rc<RefCell<RecipeForm>>,
    field: TokenField,
) {
    while let Some(child) = flow.first_child() {
        flow.remove(&child);
    }
    let tokens: Vec<String> = form.borrow().tokens(field).to_vec();
    for (index, token) in tokens.iter().enumerate() {
        let chip = gtk4::Box::new(gtk4::Orientation::Horizontal, 4);
        chip.add_css_class("card");
        chip.set_margin_top(2);
        chip.set_margin_bottom(2);

        let label = gtk4::Label::new(Some(token));
        label.set_margin_start(8);
        chip.append(&label);

        let close = gtk4::Button::from_icon_name("window-close-symbolic");
        close.add_css_class("flat");
        close.add_css_class("circular");
        let form = form.clone();
        let flow_for_close = flow.clone();
        close.connect_clicked(move |_| {
            form.borrow_mut().remove_token(field, index);
            render_chips(&flow_for_close, &form, field);
        });
        chip.append(&close);

        flow.append(&chip);
    }
}
