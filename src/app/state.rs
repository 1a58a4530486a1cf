use std::sync::{Arc, Mutex};

use gtk4::glib;

use crate::api::{ApiClient, Recipe};
use crate::config::Config;
use crate::voice::{Params, Support, VoiceMachine};

use super::voice::VoiceTarget;

/// Which recipe list a load targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeScope {
    Mine,
    All,
}

/// Events sent from background tasks to the GTK main thread.
#[derive(Debug)]
pub enum BackendEvent {
    LoginFinished(Result<(), String>),
    SignupFinished(Result<(), String>),
    RecipesLoaded {
        scope: RecipeScope,
        result: Result<Vec<Recipe>, String>,
    },
    /// Both lists re-fetched concurrently after a mutation; delivered
    /// together once both calls have completed.
    ListsRefreshed {
        all: Result<Vec<Recipe>, String>,
        mine: Result<Vec<Recipe>, String>,
    },
    CreateFinished(Result<Recipe, String>),
    UpdateFinished(Result<Recipe, String>),
    DeleteFinished {
        id: String,
        result: Result<(), String>,
    },
    GenerateFinished(Result<Recipe, String>),
    Voice(crate::voice::Event),
}

/// Central application state. Lives on the GTK main thread inside
/// Rc<RefCell<>>; background work runs on the owned tokio runtime and
/// reports back through `backend_sender`.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    /// Plain client for the speech endpoint; the API session cookie does
    /// not apply there.
    pub speech_http: reqwest::Client,
    pub backend_sender: async_channel::Sender<BackendEvent>,
    pub tokio_rt: tokio::runtime::Runtime,

    // Recipe lists
    pub all_recipes: Vec<Recipe>,
    pub my_recipes: Vec<Recipe>,
    pub all_loading: bool,
    pub my_loading: bool,
    pub all_error: Option<String>,
    pub my_error: Option<String>,

    // Dashboard UI state
    pub active_tab: RecipeScope,
    pub search_term: String,
    pub editing_id: Option<String>,

    // Per-operation request state
    pub login_loading: bool,
    pub signup_loading: bool,
    pub create_loading: bool,
    pub update_loading: bool,
    pub generate_loading: bool,

    // Voice input
    pub voice_support: Support,
    pub voice: VoiceMachine,
    pub voice_target: Option<VoiceTarget>,
    pub capture_stream: Option<cpal::Stream>,
    pub capture_buffer: Arc<Mutex<Vec<f32>>>,
    pub capture_rate: u32,
    /// Frozen utterance bytes, kept so network retries re-post the same
    /// request.
    pub utterance_wav: Option<Arc<Vec<u8>>>,
    pub timeout_source: Option<glib::SourceId>,
    pub retry_source: Option<glib::SourceId>,

    // UI handles, attached after the widgets are built
    pub ui: Option<crate::ui::Ui>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<BackendEvent>) -> Self {
        let config = Config::load();
        let api = ApiClient::new(&config.api_base_url).expect("Failed to create API client");
        let speech_http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create speech HTTP client");
        let tokio_rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let voice = VoiceMachine::new(Params {
            listen_timeout: std::time::Duration::from_secs(config.speech.listen_timeout_secs),
            network_retries: config.speech.network_retries,
            retry_backoff: std::time::Duration::from_millis(config.speech.retry_backoff_ms),
        });

        Self {
            config,
            api,
            speech_http,
            backend_sender: sender,
            tokio_rt,
            all_recipes: Vec::new(),
            my_recipes: Vec::new(),
            all_loading: false,
            my_loading: false,
            all_error: None,
            my_error: None,
            active_tab: RecipeScope::Mine,
            search_term: String::new(),
            editing_id: None,
            login_loading: false,
            signup_loading: false,
            create_loading: false,
            update_loading: false,
            generate_loading: false,
            voice_support: Support::Unsupported {
                reason: "not probed yet".into(),
            },
            voice,
            voice_target: None,
            capture_stream: None,
            capture_buffer: Arc::new(Mutex::new(Vec::new())),
            capture_rate: 16000,
            utterance_wav: None,
            timeout_source: None,
            retry_source: None,
            ui: None,
        }
    }
}
