use gtk4::prelude::*;
use libadwaita::prelude::*;

/// Handles returned from building the login page.
pub struct LoginWidgets {
    pub root: gtk4::Box,
    pub email_row: libadwaita::EntryRow,
    pub password_row: libadwaita::PasswordEntryRow,
    pub email_error: gtk4::Label,
    pub password_error: gtk4::Label,
    pub page_error: gtk4::Label,
    pub submit: gtk4::Button,
    pub go_signup: gtk4::Button,
}

/// Build the login page. Wiring happens in `main`.
pub fn build_login() -> LoginWidgets {
    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_valign(gtk4::Align::Center);

    let title = gtk4::Label::new(Some("Login"));
    title.add_css_class("title-2");
    root.append(&title);

    let group = libadwaita::PreferencesGroup::new();
    group.set_margin_top(16);

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

    root.append(&group);

    let page_error = gtk4::Label::new(None);
    page_error.add_css_class("error");
    page_error.set_wrap(true);
    page_error.set_margin_top(8);
    root.append(&page_error);

    let submit = gtk4::Button::builder()
        .label("Login")
        .margin_top(16)
        .build();
    submit.add_css_class("suggested-action");
    submit.add_css_class("pill");
    root.append(&submit);

    let go_signup = gtk4::Button::builder()
        .label("Don\u{2019}t have an account? Sign Up")
        .margin_top(8)
        .build();
    go_signup.add_css_class("flat");
    root.append(&go_signup);

    LoginWidgets {
        root,
        email_row,
        password_row,
        email_error,
        password_error,
        page_error,
        submit,
        go_signup,
    }
}

pub(super) fn field_error_label() -> gtk4::Label {
    let label = gtk4::Label::new(None);
    label.add_css_class("error");
    label.add_css_class("caption");
    label.set_xalign(0.0);
    label
}
