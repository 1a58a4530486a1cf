mod api;
mod app;
mod audio_feedback;
mod config;
mod form;
mod recorder;
mod search;
mod speech;
mod ui;
mod validate;
mod voice;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, BackendEvent, DialogKind, RecipeScope, VoiceTarget};
use form::TokenField;

fn main() {
    env_logger::init();
    log::info!("Recipe Desk starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.recipedesk.recipe-desk")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Create async channel for backend → UI communication
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();

    // Build app state and probe voice support once at startup
    let state = Rc::new(RefCell::new(AppState::new(backend_tx)));
    {
        let speech = state.borrow().config.speech.clone();
        state.borrow_mut().voice_support = voice::probe(&speech);
        if let Some(reason) = state.borrow().voice_support.reason() {
            log::warn!("Voice input unavailable: {reason}");
        }
    }

    // Build UI
    let login = ui::login::build_login();
    let signup = ui::signup::build_signup();
    let dashboard = ui::dashboard::build_dashboard();
    let create = ui::recipe_form::build_recipe_form("Create Recipe", "Create");
    let edit = ui::recipe_form::build_recipe_form("Edit Recipe", "Save");
    let generate = ui::generate::build_generate();

    let stack = gtk4::Stack::new();
    stack.set_transition_type(gtk4::StackTransitionType::Crossfade);
    stack.add_named(&signup.root, Some("signup"));
    stack.add_named(&login.root, Some("login"));
    stack.add_named(&dashboard.root, Some("dashboard"));
    stack.set_visible_child_name("signup");

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = libadwaita::HeaderBar::builder()
        .title_widget(&libadwaita::WindowTitle::new("Recipe Desk", ""))
        .build();
    content.append(&header);
    content.append(&stack);

    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .default_width(520)
        .default_height(640)
        .content(&content)
        .build();

    for dialog in [&create.window, &edit.window, &generate.window] {
        dialog.set_transient_for(Some(&window));
    }

    // Disabled mic buttons carry the probe's reason as a tooltip
    if let Some(reason) = state.borrow().voice_support.reason() {
        let text = format!("Voice input unavailable: {reason}");
        for mic in [
            &create.mic_ingredients,
            &create.mic_tags,
            &edit.mic_ingredients,
            &edit.mic_tags,
            &generate.mic,
        ] {
            mic.set_sensitive(false);
            mic.set_tooltip_text(Some(&text));
        }
    }

    // Wire up auth pages
    {
        let state_clone = state.clone();
        login.submit.connect_clicked(move |_| submit_login(&state_clone));
    }
    {
        let state_clone = state.clone();
        login.go_signup.connect_clicked(move |_| {
            app::show_page(&state_clone, "signup");
        });
    }
    {
        let state_clone = state.clone();
        signup.submit.connect_clicked(move |_| submit_signup(&state_clone));
    }
    {
        let state_clone = state.clone();
        signup.go_login.connect_clicked(move |_| {
            app::show_page(&state_clone, "login");
        });
    }

    // Wire up the dashboard
    {
        let state_clone = state.clone();
        dashboard.create_button.connect_clicked(move |_| {
            let s = state_clone.borrow();
            if let Some(ui) = &s.ui {
                ui.create.window.present();
            }
        });
    }
    {
        let state_clone = state.clone();
        dashboard.generate_button.connect_clicked(move |_| {
            let s = state_clone.borrow();
            if let Some(ui) = &s.ui {
                ui.generate.window.present();
            }
        });
    }
    {
        let state_clone = state.clone();
        dashboard.my_tab.connect_toggled(move |button| {
            if button.is_active() {
                state_clone.borrow_mut().active_tab = RecipeScope::Mine;
                app::render_dashboard(&state_clone);
            }
        });
    }
    {
        let state_clone = state.clone();
        dashboard.all_tab.connect_toggled(move |button| {
            if button.is_active() {
                state_clone.borrow_mut().active_tab = RecipeScope::All;
                app::render_dashboard(&state_clone);
            }
        });
    }
    {
        let state_clone = state.clone();
        dashboard.search_entry.connect_search_changed(move |entry| {
            state_clone.borrow_mut().search_term = entry.text().to_string();
            app::render_dashboard(&state_clone);
        });
    }

    // Wire up the dialogs
    wire_recipe_dialog(&state, &create, DialogKind::Create);
    wire_recipe_dialog(&state, &edit, DialogKind::Edit);
    wire_generate_dialog(&state, &generate);

    // Store UI handles in state
    state.borrow_mut().ui = Some(ui::Ui {
        window: window.clone(),
        stack,
        login,
        signup,
        dashboard,
        create,
        edit,
        generate,
    });

    window.present();

    // Attach backend event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }
}

fn submit_login(state: &Rc<RefCell<AppState>>) {
    let (email, password) = {
        let s = state.borrow();
        let Some(ui) = &s.ui else { return };
        (
            ui.login.email_row.text().to_string(),
            ui.login.password_row.text().to_string(),
        )
    };
    let errors = validate::validate_login(&email, &password);
    {
        let s = state.borrow();
        let Some(ui) = &s.ui else { return };
        ui.login
            .email_error
            .set_text(errors.get("email").copied().unwrap_or(""));
        ui.login
            .password_error
            .set_text(errors.get("password").copied().unwrap_or(""));
    }
    if errors.is_empty() {
        app::dispatch_login(state, email, password);
    }
}

fn submit_signup(state: &Rc<RefCell<AppState>>) {
    let (name, email, password, confirm) = {
        let s = state.borrow();
        let Some(ui) = &s.ui else { return };
        (
            ui.signup.name_row.text().to_string(),
            ui.signup.email_row.text().to_string(),
            ui.signup.password_row.text().to_string(),
            ui.signup.confirm_row.text().to_string(),
        )
    };
    let errors = validate::validate_signup(&name, &email, &password, &confirm);
    {
        let s = state.borrow();
        let Some(ui) = &s.ui else { return };
        ui.signup
            .name_error
            .set_text(errors.get("name").copied().unwrap_or(""));
        ui.signup
            .email_error
            .set_text(errors.get("email").copied().unwrap_or(""));
        ui.signup
            .password_error
            .set_text(errors.get("password").copied().unwrap_or(""));
        ui.signup
            .confirm_error
            .set_text(errors.get("confirmPassword").copied().unwrap_or(""));
    }
    if errors.is_empty() {
        app::dispatch_signup(
            state,
            api::SignupRequest {
                name: name.trim().to_string(),
                email,
                password,
                confirm_password: confirm,
            },
        );
    }
}

fn wire_recipe_dialog(
    state: &Rc<RefCell<AppState>>,
    widgets: &ui::recipe_form::RecipeFormWidgets,
    kind: DialogKind,
) {
    {
        let state_clone = state.clone();
        let form = widgets.form.clone();
        let error_label = widgets.error_label.clone();
        widgets.submit.connect_clicked(move |_| {
            let submission = {
                let form = form.borrow();
                match form.validate_for_submit() {
                    Ok(()) => form.to_submission(),
                    Err(message) => {
                        error_label.set_text(&message);
                        return;
                    }
                }
            };
            match kind {
                DialogKind::Create => app::dispatch_create(&state_clone, submission),
                DialogKind::Edit => {
                    let id = state_clone.borrow().editing_id.clone();
                    if let Some(id) = id {
                        app::dispatch_update(&state_clone, id, submission);
                    }
                }
                DialogKind::Generate => unreachable!("generate uses its own dialog"),
            }
        });
    }
    {
        let state_clone = state.clone();
        widgets.cancel.connect_clicked(move |_| {
            app::close_form(&state_clone, kind);
        });
    }
    {
        // Closing the dialog resets it and silently aborts any voice session
        let state_clone = state.clone();
        widgets.window.connect_close_request(move |_| {
            app::close_form(&state_clone, kind);
            gtk4::glib::Propagation::Proceed
        });
    }
    {
        let state_clone = state.clone();
        widgets.mic_ingredients.connect_clicked(move |_| {
            app::press_mic(
                &state_clone,
                VoiceTarget {
                    dialog: kind,
                    field: TokenField::Ingredients,
                },
            );
        });
    }
    {
        let state_clone = state.clone();
        widgets.mic_tags.connect_clicked(move |_| {
            app::press_mic(
                &state_clone,
                VoiceTarget {
                    dialog: kind,
                    field: TokenField::Tags,
                },
            );
        });
    }
}

fn wire_generate_dialog(state: &Rc<RefCell<AppState>>, widgets: &ui::generate::GenerateWidgets) {
    {
        let state_clone = state.clone();
        let form = widgets.form.clone();
        let error_label = widgets.error_label.clone();
        widgets.submit.connect_clicked(move |_| {
            let ingredients = form.borrow().ingredients.clone();
            if ingredients.is_empty() {
                error_label.set_text("Please add at least one ingredient.");
                return;
            }
            app::dispatch_generate(&state_clone, ingredients);
        });
    }
    {
        let state_clone = state.clone();
        widgets.cancel.connect_clicked(move |_| {
            app::close_form(&state_clone, DialogKind::Generate);
        });
    }
    {
        let state_clone = state.clone();
        widgets.window.connect_close_request(move |_| {
            app::close_form(&state_clone, DialogKind::Generate);
            gtk4::glib::Propagation::Proceed
        });
    }
    {
        let state_clone = state.clone();
        widgets.mic.connect_clicked(move |_| {
            app::press_mic(
                &state_clone,
                VoiceTarget {
                    dialog: DialogKind::Generate,
                    field: TokenField::Ingredients,
                },
            );
        });
    }
}
