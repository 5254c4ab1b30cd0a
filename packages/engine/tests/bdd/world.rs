//! World struct for Cucumber BDD tests
//!
//! Contains the test state that persists across steps in a scenario.

use cucumber::World;
use versemap_engine::{
    EngineError, LoadOptions, Location, RuleSet, Translation, VerseKey, VerseMapService,
};

/// Test world that holds state across steps in a Cucumber scenario.
#[derive(Debug, Default, World)]
pub struct VersemapWorld {
    /// Rule document text from the scenario
    pub document: String,
    /// Service built from `document` (if loading succeeded)
    pub service: Option<VerseMapService>,
    /// Last load error
    pub error: Option<EngineError>,
    /// Result of the last match query
    pub mapped: Vec<VerseKey>,
    /// Members of the last cluster query
    pub members: Vec<Location>,
    /// Id of the last cluster query
    pub cluster_id: Option<String>,
    /// Same-translation siblings of the last cluster query
    pub siblings: Vec<VerseKey>,
}

impl VersemapWorld {
    /// Load `document` and store the service or error
    pub fn load(&mut self, options: LoadOptions) {
        match RuleSet::from_yaml_str_with(&self.document, options) {
            Ok(rules) => {
                self.service = Some(VerseMapService::new(rules));
                self.error = None;
            }
            Err(e) => {
                self.service = None;
                self.error = Some(e);
            }
        }
    }

    /// The loaded service, loading with default options on first use
    pub fn service(&mut self) -> &VerseMapService {
        if self.service.is_none() && self.error.is_none() {
            self.load(LoadOptions::default());
        }
        match &self.service {
            Some(service) => service,
            None => panic!(
                "Rule set failed to load: {:?}",
                self.error.as_ref().map(|e| e.to_string())
            ),
        }
    }

    pub fn translation(tag: &str) -> Translation {
        Translation::new(tag)
    }

    /// Get error message if loading failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
