//! Backend event handling: applies completion events to state and UI, and
//! runs each operation's post-success side effect (navigation, dialog
//! close, list refresh).

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;
use libadwaita::prelude::*;

use crate::api::Recipe;
use crate::form::RecipeForm;
use crate::search;

use super::dispatch::{dispatch_delete, dispatch_load, dispatch_refresh_lists};
use super::state::{AppState, BackendEvent, RecipeScope};
use super::voice::{self, DialogKind};

/// Switch the visible page of the window stack.
pub fn show_page(state: &Rc<RefCell<AppState>>, name: &str) {
    let s = state.borrow();
    if let Some(ui) = &s.ui {
        ui.stack.set_visible_child_name(name);
    }
}

pub fn handle_backend_event(state: &Rc<RefCell<AppState>>, event: BackendEvent) {
    match event {
        BackendEvent::LoginFinished(result) => {
            {
                let mut s = state.borrow_mut();
                s.login_loading = false;
                if let Some(ui) = &s.ui {
                    ui.login.submit.set_sensitive(true);
                }
            }
            match result {
                Ok(()) => {
                    log::info!("Login succeeded");
                    show_page(state, "dashboard");
                    dispatch_load(state, RecipeScope::Mine);
                    dispatch_load(state, RecipeScope::All);
                }
                Err(message) => {
                    let s = state.borrow();
                    if let Some(ui) = &s.ui {
                        ui.login.page_error.set_text(&message);
                    }
                }
            }
        }
        BackendEvent::SignupFinished(result) => {
            {
                let mut s = state.borrow_mut();
                s.signup_loading = false;
                if let Some(ui) = &s.ui {
                    ui.signup.submit.set_sensitive(true);
                }
            }
            match result {
                Ok(()) => {
                    log::info!("Signup succeeded");
                    show_page(state, "dashboard");
                    dispatch_load(state, RecipeScope::Mine);
                    dispatch_load(state, RecipeScope::All);
                }
                Err(message) => {
                    let s = state.borrow();
                    if let Some(ui) = &s.ui {
                        ui.signup.page_error.set_text(&message);
                    }
                }
            }
        }
        BackendEvent::RecipesLoaded { scope, result } => {
            {
                let mut s = state.borrow_mut();
                match scope {
                    RecipeScope::Mine => {
                        s.my_loading = false;
                        match result {
                            Ok(list) => {
                                s.my_recipes = list;
                                s.my_error = None;
                            }
                            Err(message) => s.my_error = Some(message),
                        }
                    }
                    RecipeScope::All => {
                        s.all_loading = false;
                        match result {
                            Ok(list) => {
                                s.all_recipes = list;
                                s.all_error = None;
                            }
                            Err(message) => s.all_error = Some(message),
                        }
                    }
                }
            }
            render_dashboard(state);
        }
        BackendEvent::ListsRefreshed { all, mine } => {
            {
                let mut s = state.borrow_mut();
                s.all_loading = false;
                s.my_loading = false;
                match all {
                    Ok(list) => {
                        s.all_recipes = list;
                        s.all_error = None;
                    }
                    Err(message) => s.all_error = Some(message),
                }
                match mine {
                    Ok(list) => {
                        s.my_recipes = list;
                        s.my_error = None;
                    }
                    Err(message) => s.my_error = Some(message),
                }
            }
            render_dashboard(state);
        }
        BackendEvent::CreateFinished(result) => {
            {
                let mut s = state.borrow_mut();
                s.create_loading = false;
                if let Some(ui) = &s.ui {
                    ui.create.submit.set_sensitive(true);
                }
            }
            match result {
                Ok(recipe) => {
                    log::info!("Created recipe {}", recipe.id);
                    close_form(state, DialogKind::Create);
                    dispatch_refresh_lists(state);
                }
                Err(message) => {
                    let s = state.borrow();
                    if let Some(ui) = &s.ui {
                        ui.create.error_label.set_text(&message);
                    }
                }
            }
        }
        BackendEvent::UpdateFinished(result) => {
            {
                let mut s = state.borrow_mut();
                s.update_loading = false;
                if let Some(ui) = &s.ui {
                    ui.edit.submit.set_sensitive(true);
                }
            }
            match result {
                Ok(recipe) => {
                    log::info!("Updated recipe {}", recipe.id);
                    state.borrow_mut().editing_id = None;
                    close_form(state, DialogKind::Edit);
                    dispatch_refresh_lists(state);
                }
                Err(message) => {
                    let s = state.borrow();
                    if let Some(ui) = &s.ui {
                        ui.edit.error_label.set_text(&message);
                    }
                }
            }
        }
        BackendEvent::DeleteFinished { id, result } => match result {
            Ok(()) => {
                log::info!("Deleted recipe {id}");
                dispatch_refresh_lists(state);
            }
            Err(message) => {
                let s = state.borrow();
                if let Some(ui) = &s.ui {
                    ui.dashboard.error_label.set_text(&message);
                }
            }
        },
        BackendEvent::GenerateFinished(result) => {
            {
                let mut s = state.borrow_mut();
                s.generate_loading = false;
                if let Some(ui) = &s.ui {
                    ui.generate.submit.set_sensitive(true);
                }
            }
            match result {
                Ok(recipe) => {
                    log::info!("Generated recipe {}", recipe.title);
                    close_form(state, DialogKind::Generate);
                    dispatch_refresh_lists(state);
                }
                Err(message) => {
                    let s = state.borrow();
                    if let Some(ui) = &s.ui {
                        ui.generate.error_label.set_text(&message);
                    }
                }
            }
        }
        BackendEvent::Voice(event) => voice::drive(state, event),
    }
}

/// Re-render the dashboard list for the active tab, search term, and load
/// state.
pub fn render_dashboard(state: &Rc<RefCell<AppState>>) {
    let (recipes, loading, error, term) = {
        let s = state.borrow();
        let (list, loading, error) = match s.active_tab {
            RecipeScope::Mine => (&s.my_recipes, s.my_loading, s.my_error.clone()),
            RecipeScope::All => (&s.all_recipes, s.all_loading, s.all_error.clone()),
        };
        (list.clone(), loading, error, s.search_term.clone())
    };
    let filtered: Vec<Recipe> = recipes
        .iter()
        .filter(|r| search::matches(r, &term))
        .cloned()
        .collect();

    let s = state.borrow();
    let Some(ui) = &s.ui else { return };
    ui.dashboard.spinner.set_visible(loading);
    if loading {
        ui.dashboard.spinner.start();
    } else {
        ui.dashboard.spinner.stop();
    }
    ui.dashboard
        .error_label
        .set_text(error.as_deref().unwrap_or(""));

    let on_view = {
        let state = state.clone();
        move |recipe: Recipe| {
            let s = state.borrow();
            if let Some(ui) = &s.ui {
                let picture = crate::ui::detail::show_detail(&ui.window, &recipe);
                if let (Some(picture), Some(url)) = (picture, recipe.image_url.clone()) {
                    load_detail_image(&s, url, picture);
                }
            }
        }
    };
    let on_edit = {
        let state = state.clone();
        move |recipe: Recipe| open_edit(&state, recipe)
    };
    let on_delete = {
        let state = state.clone();
        move |recipe: Recipe| confirm_delete(&state, recipe)
    };
    crate::ui::dashboard::render_list(&ui.dashboard, &filtered, on_view, on_edit, on_delete);
}

/// Fetch the photo on the runtime and hand the decoded texture to the
/// detail window's placeholder. Failures only log; the window stays usable
/// without the image.
fn load_detail_image(s: &AppState, url: String, picture: gtk4::Picture) {
    let (tx, rx) = async_channel::bounded::<Vec<u8>>(1);
    let api = s.api.clone();
    s.tokio_rt.spawn(async move {
        match api.fetch_image(&url).await {
            Ok(bytes) => {
                let _ = tx.send(bytes).await;
            }
            Err(e) => log::warn!("Failed to load recipe image: {e}"),
        }
    });
    glib::spawn_future_local(async move {
        if let Ok(bytes) = rx.recv().await {
            match gtk4::gdk::Texture::from_bytes(&glib::Bytes::from_owned(bytes)) {
                Ok(texture) => {
                    picture.set_paintable(Some(&texture));
                    picture.set_visible(true);
                }
                Err(e) => log::warn!("Could not decode recipe image: {e}"),
            }
        }
    });
}

fn open_edit(state: &Rc<RefCell<AppState>>, recipe: Recipe) {
    state.borrow_mut().editing_id = Some(recipe.id.clone());
    let s = state.borrow();
    if let Some(ui) = &s.ui {
        *ui.edit.form.borrow_mut() = RecipeForm::from_recipe(&recipe);
        crate::ui::recipe_form::sync_inputs(&ui.edit);
        crate::ui::recipe_form::refresh_all_chips(&ui.edit);
        ui.edit.error_label.set_text("");
        ui.edit.window.present();
    }
}

fn confirm_delete(state: &Rc<RefCell<AppState>>, recipe: Recipe) {
    let s = state.borrow();
    let Some(ui) = &s.ui else { return };
    let dialog = libadwaita::AlertDialog::builder()
        .heading("Delete recipe?")
        .body(format!("\u{201c}{}\u{201d} will be removed permanently.", recipe.title))
        .build();
    dialog.add_response("cancel", "Cancel");
    dialog.add_response("delete", "Delete");
    dialog.set_response_appearance("delete", libadwaita::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("cancel"));

    let state_clone = state.clone();
    let id = recipe.id;
    let parent: Option<&gtk4::Widget> = Some(ui.window.upcast_ref());
    dialog.choose(parent, None::<&gtk4::gio::Cancellable>, move |response| {
        if response == "delete" {
            dispatch_delete(&state_clone, id.clone());
        }
    });
}

/// Hide a dialog and reset everything it owns, including any voice session
/// aimed at it.
pub fn close_form(state: &Rc<RefCell<AppState>>, kind: DialogKind) {
    voice::cancel_voice(state);
    let s = state.borrow();
    let Some(ui) = &s.ui else { return };
    match kind {
        DialogKind::Create => {
            ui.create.form.borrow_mut().reset();
            crate::ui::recipe_form::sync_inputs(&ui.create);
            crate::ui::recipe_form::refresh_all_chips(&ui.create);
            ui.create.error_label.set_text("");
            ui.create.voice_status.set_text("");
            ui.create.window.set_visible(false);
        }
        DialogKind::Edit => {
            ui.edit.form.borrow_mut().reset();
            crate::ui::recipe_form::sync_inputs(&ui.edit);
            crate::ui::recipe_form::refresh_all_chips(&ui.edit);
            ui.edit.error_label.set_text("");
            ui.edit.voice_status.set_text("");
            ui.edit.window.set_visible(false);
        }
        DialogKind::Generate => {
            ui.generate.form.borrow_mut().reset();
            crate::ui::generate::refresh_chips(&ui.generate);
            ui.generate.error_label.set_text("");
            ui.generate.voice_status.set_text("");
            ui.generate.window.set_visible(false);
        }
    }
}
