//! Request dispatchers: flip the operation's loading flag, run the call on
//! the tokio runtime, and report completion as a [`BackendEvent`]. Failures
//! are stored for display, never retried.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use crate::api::{LoginRequest, RecipeSubmission, SignupRequest};

use super::state::{AppState, BackendEvent, RecipeScope};

pub fn dispatch_login(state: &Rc<RefCell<AppState>>, email: String, password: String) {
    let mut s = state.borrow_mut();
    s.login_loading = true;
    if let Some(ui) = &s.ui {
        ui.login.page_error.set_text("");
        ui.login.submit.set_sensitive(false);
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api
            .login(&LoginRequest { email, password })
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::LoginFinished(result)).await;
    });
}

pub fn dispatch_signup(state: &Rc<RefCell<AppState>>, req: SignupRequest) {
    let mut s = state.borrow_mut();
    s.signup_loading = true;
    if let Some(ui) = &s.ui {
        ui.signup.page_error.set_text("");
        ui.signup.submit.set_sensitive(false);
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api
            .signup(&req)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::SignupFinished(result)).await;
    });
}

pub fn dispatch_load(state: &Rc<RefCell<AppState>>, scope: RecipeScope) {
    let mut s = state.borrow_mut();
    match scope {
        RecipeScope::All => {
            s.all_loading = true;
            s.all_error = None;
        }
        RecipeScope::Mine => {
            s.my_loading = true;
            s.my_error = None;
        }
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = match scope {
            RecipeScope::All => api.all_recipes().await,
            RecipeScope::Mine => api.my_recipes().await,
        }
        .map_err(|e| e.to_string());
        let _ = sender
            .send(BackendEvent::RecipesLoaded { scope, result })
            .await;
    });
}

/// Re-fetch both lists concurrently after a mutation. Both calls are
/// awaited; the results arrive in one event.
pub fn dispatch_refresh_lists(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    s.all_loading = true;
    s.my_loading = true;
    s.all_error = None;
    s.my_error = None;
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let (all, mine) = tokio::join!(api.all_recipes(), api.my_recipes());
        let _ = sender
            .send(BackendEvent::ListsRefreshed {
                all: all.map_err(|e| e.to_string()),
                mine: mine.map_err(|e| e.to_string()),
            })
            .await;
    });
}

pub fn dispatch_create(state: &Rc<RefCell<AppState>>, submission: RecipeSubmission) {
    let mut s = state.borrow_mut();
    s.create_loading = true;
    if let Some(ui) = &s.ui {
        ui.create.error_label.set_text("");
        ui.create.submit.set_sensitive(false);
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api
            .create_recipe(&submission)
            .await
            .map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::CreateFinished(result)).await;
    });
}

pub fn dispatch_update(state: &Rc<RefCell<AppState>>, id: String, submission: RecipeSubmission) {
    let mut s = state.borrow_mut();
    s.update_loading = true;
    if let Some(ui) = &s.ui {
        ui.edit.error_label.set_text("");
        ui.edit.submit.set_sensitive(false);
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api
            .update_recipe(&id, &submission)
            .await
            .map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::UpdateFinished(result)).await;
    });
}

pub fn dispatch_delete(state: &Rc<RefCell<AppState>>, id: String) {
    let s = state.borrow();
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api.delete_recipe(&id).await.map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::DeleteFinished { id, result }).await;
    });
}

pub fn dispatch_generate(state: &Rc<RefCell<AppState>>, ingredients: Vec<String>) {
    let mut s = state.borrow_mut();
    s.generate_loading = true;
    if let Some(ui) = &s.ui {
        ui.generate.error_label.set_text("");
        ui.generate.submit.set_sensitive(false);
    }
    let api = s.api.clone();
    let sender = s.backend_sender.clone();
    s.tokio_rt.spawn(async move {
        let result = api
            .generate_recipe(&ingredients)
            .await
            .map_err(|e| e.to_string());
        let _ = sender.send(BackendEvent::GenerateFinished(result)).await;
    });
}
