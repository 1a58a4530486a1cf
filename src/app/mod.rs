mod dispatch;
mod event_handler;
mod state;
mod voice;

pub use dispatch::{
    dispatch_create, dispatch_delete, dispatch_generate, dispatch_load, dispatch_login,
    dispatch_refresh_lists, dispatch_signup, dispatch_update,
};
pub use event_handler::{close_form, handle_backend_event, render_dashboard, show_page};
pub use state::{AppState, BackendEvent, RecipeScope};
pub use voice::{cancel_voice, press_mic, DialogKind, VoiceTarget};
