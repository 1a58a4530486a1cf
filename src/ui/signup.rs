use gtk4::prelude::*;
use libadwaita::prelude::*;

use super::login::field_error_label;

/// Handles returned from building the signup page.
pub struct SignupWidgets {
    pub root: gtk4::Box,
    pub name_row: libadwaita::EntryRow,
    pub email_row: libadwaita::EntryRow,
    pub password_row: libadwaita::PasswordEntryRow,
    pub confirm_row: libadwaita::PasswordEntryRow,
    pub name_error: gtk4::Label,
    pub email_error: gtk4::Label,
    pub password_error: gtk4::Label,
    pub confirm_error: gtk4::Label,
    pub page_error: gtk4::Label,
    pub submit: gtk4::Button,
    pub go_login: gtk4::Button,
}

/// Build the signup page, the app's landing view.
pub fn build_signup() -> SignupWidgets {
    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_valign(gtk4::Align::Center);

    let title = gtk4::Label::new(Some("Sign Up"));
    title.add_css_class("title-2");
    root.append(&title);

    let group = libadwaita::PreferencesGroup::new();
    group.set_margin_top(16);

    let name_row = libadwaita::EntryRow::builder().title("Name").build();
    group.add(&name_row);
    let name_error = field_error_label();
    group.add(&name_error);

    let email_row = libadwaita::EntryRow::builder().title("Email").build();
    group.add(&email_row);
    let email_error = field_error_label();
    group.add(&email_error);

    let password_row = libadwaita::PasswordEntryRow::builder()
        .title("Password")
        .build();
    group.add(&password_row);
    let password_error = field_error_label();
    group.add(&password_error);

    let confirm_row = libadwaita::PasswordEntryRow::builder()
        .title("Confirm Password")
        .build();
    group.add(&confirm_row);
    let confirm_error = field_error_label();
    group.add(&confirm_error);

    root.append(&group);

    let page_error = gtk4::Label::new(None);
    page_error.add_css_class("error");
    page_error.set_wrap(true);
    page_error.set_margin_top(8);
    root.append(&page_error);

    let submit = gtk4::Button::builder()
        .label("Sign Up")
        .margin_top(16)
        .build();
    submit.add_css_class("suggested-action");
    submit.add_css_class("pill");
    root.append(&submit);

    let go_login = gtk4::Button::builder()
        .label("Already have an account? Login")
        .margin_top(8)
        .build();
    go_login.add_css_class("flat");
    root.append(&go_login);

    SignupWidgets {
        root,
        name_row,
        email_row,
        password_row,
        confirm_row,
        name_error,
        email_error,
        password_error,
        confirm_error,
        page_error,
        submit,
        go_login,
    }
}
