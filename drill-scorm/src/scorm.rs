//! SCORM data-model client
//!
//! ScormClient speaks the SCORM key/value protocol through a raw
//! [`ScormApi`] seam. In a web build the seam binds to the host page's
//! SCORM adapter; tests and desktop runs use [`InMemoryScormApi`]. Every
//! write is followed by an explicit commit; uncommitted writes are not
//! durable on the host side.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::client::LmsClient;
use crate::keys;

/// Raw SCORM adapter surface
///
/// Mirrors the host API: booleans signal per-call success, never errors.
pub trait ScormApi: Send {
    fn initialize(&mut self) -> bool;
    fn get_value(&mut self, element: &str) -> Option<String>;
    fn set_value(&mut self, element: &str, value: &str) -> bool;
    fn commit(&mut self) -> bool;
    fn terminate(&mut self) -> bool;
}

/// LMS client over the SCORM data model
pub struct ScormClient {
    api: Box<dyn ScormApi>,
    initialized: bool,
    learner_name: String,
    fallback_name: String,
}

impl ScormClient {
    /// Create a client over a raw adapter
    ///
    /// `fallback_name` is used when the host reports no learner name.
    pub fn new(api: Box<dyn ScormApi>, fallback_name: &str) -> Self {
        Self {
            api,
            initialized: false,
            learner_name: fallback_name.to_string(),
            fallback_name: fallback_name.to_string(),
        }
    }

    fn set_and_log(&mut self, element: &str, value: &str) {
        if !self.api.set_value(element, value) {
            warn!(element, "SCORM set_value rejected");
        }
    }
}

impl LmsClient for ScormClient {
    fn initialize(&mut self) {
        self.initialized = self.api.initialize();
        if !self.initialized {
            warn!("SCORM initialization failed");
            return;
        }

        self.learner_name = self
            .api
            .get_value(keys::STUDENT_NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.fallback_name.clone());
        debug!(learner = %self.learner_name, "SCORM initialized");

        self.set_and_log(keys::LESSON_STATUS, "incomplete");
        self.set_and_log(keys::SCORE_MIN, "0");
        self.set_and_log(keys::SCORE_MAX, "100");
        self.api.commit();
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn learner_name(&self) -> &str {
        &self.learner_name
    }

    fn set_learner_name(&mut self, name: &str) {
        self.learner_name = name.to_string();
    }

    fn report_progress(&mut self, progress: f32) {
        if !self.initialized {
            return;
        }
        let percent = (progress * 100.0).round() as i32;
        self.set_and_log(keys::SCORE_RAW, &percent.to_string());
        self.set_and_log(keys::LESSON_LOCATION, &format!("progress_{percent}"));
        self.api.commit();
        debug!(percent, "progress reported");
    }

    fn report_completion(&mut self, passed: bool, correct: u32, total: u32) {
        if !self.initialized {
            return;
        }
        let status = if passed { "passed" } else { "failed" };
        let percent = if total == 0 {
            100
        } else {
            (correct as f32 / total as f32 * 100.0).round() as i32
        };
        self.set_and_log(keys::LESSON_STATUS, status);
        self.set_and_log(keys::SCORE_RAW, &percent.to_string());
        self.set_and_log(keys::EXIT, "");
        self.api.commit();
        debug!(status, correct, total, "completion reported");
    }

    fn set_suspend_data(&mut self, data: &str) {
        if !self.initialized {
            return;
        }
        self.set_and_log(keys::SUSPEND_DATA, data);
        self.api.commit();
    }

    fn terminate(&mut self) {
        if !self.initialized {
            return;
        }
        self.api.terminate();
        self.initialized = false;
        debug!("SCORM terminated");
    }
}

/// In-memory SCORM host for tests and desktop runs
///
/// Stores values in a map and tracks what has actually been committed,
/// so tests can assert on commit discipline.
pub struct InMemoryScormApi {
    values: HashMap<String, String>,
    committed: HashMap<String, String>,
    commit_count: usize,
    fail_initialize: bool,
    initialized: bool,
}

impl InMemoryScormApi {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            committed: HashMap::new(),
            commit_count: 0,
            fail_initialize: false,
            initialized: false,
        }
    }

    /// Host with a pre-seeded learner name
    pub fn with_student_name(name: &str) -> Self {
        let mut api = Self::new();
        api.values
            .insert(keys::STUDENT_NAME.to_string(), name.to_string());
        api
    }

    /// Host whose initialize call fails
    pub fn failing() -> Self {
        let mut api = Self::new();
        api.fail_initialize = true;
        api
    }

    /// Last committed value of an element
    pub fn committed(&self, element: &str) -> Option<&str> {
        self.committed.get(element).map(String::as_str)
    }

    /// Uncommitted (staged) value of an element
    pub fn staged(&self, element: &str) -> Option<&str> {
        self.values.get(element).map(String::as_str)
    }

    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    pub fn is_open(&self) -> bool {
        self.initialized
    }
}

impl Default for InMemoryScormApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScormApi for InMemoryScormApi {
    fn initialize(&mut self) -> bool {
        if self.fail_initialize {
            return false;
        }
        self.initialized = true;
        true
    }

    fn get_value(&mut self, element: &str) -> Option<String> {
        self.values.get(element).cloned()
    }

    fn set_value(&mut self, element: &str, value: &str) -> bool {
        if !self.initialized {
            return false;
        }
        self.values.insert(element.to_string(), value.to_string());
        true
    }

    fn commit(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.committed = self.values.clone();
        self.commit_count += 1;
        true
    }

    fn terminate(&mut self) -> bool {
        self.initialized = false;
        true
    }
}

/// Cloneable view over an [`InMemoryScormApi`]
///
/// Lets a caller keep inspecting host state after the adapter has been
/// boxed into a [`ScormClient`].
#[derive(Clone)]
pub struct SharedScormApi(Arc<Mutex<InMemoryScormApi>>);

impl SharedScormApi {
    pub fn new(api: InMemoryScormApi) -> Self {
        Self(Arc::new(Mutex::new(api)))
    }

    /// Last committed value of an element
    pub fn committed(&self, element: &str) -> Option<String> {
        self.0
            .lock()
            .ok()
            .and_then(|api| api.committed(element).map(str::to_string))
    }

    pub fn commit_count(&self) -> usize {
        self.0.lock().map(|api| api.commit_count()).unwrap_or(0)
    }

    pub fn is_open(&self) -> bool {
        self.0.lock().map(|api| api.is_open()).unwrap_or(false)
    }
}

impl ScormApi for SharedScormApi {
    fn initialize(&mut self) -> bool {
        self.0.lock().map(|mut api| api.initialize()).unwrap_or(false)
    }

    fn get_value(&mut self, element: &str) -> Option<String> {
        self.0.lock().ok().and_then(|mut api| api.get_value(element))
    }

    fn set_value(&mut self, element: &str, value: &str) -> bool {
        self.0
            .lock()
            .map(|mut api| api.set_value(element, value))
            .unwrap_or(false)
    }

    fn commit(&mut self) -> bool {
        self.0.lock().map(|mut api| api.commit()).unwrap_or(false)
    }

    fn terminate(&mut self) -> bool {
        self.0.lock().map(|mut api| api.terminate()).unwrap_or(false)
    }
}
