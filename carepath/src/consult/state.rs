//! Consultation state, its partial update, and the routing labels.

use serde::{Deserialize, Serialize};

use crate::graph::GraphState;
use crate::media::{GeoPoint, MediaHandle};

/// Top-level intent of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Symptom,
    Preventive,
    General,
}

impl Intent {
    /// Labels offered to the classifier, in matching priority order.
    pub const LABELS: [&'static str; 3] = ["symptom", "preventive", "general"];

    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Symptom => "symptom",
            Intent::Preventive => "preventive",
            Intent::General => "general",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "symptom" => Some(Intent::Symptom),
            "preventive" => Some(Intent::Preventive),
            "general" => Some(Intent::General),
            _ => None,
        }
    }

    /// Maps raw classifier output onto an intent.
    ///
    /// Trims and lowercases, then accepts an exact label, a label as the first word, or a
    /// label contained anywhere (checked in `LABELS` order). Anything else is `General`.
    pub fn from_classification(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        if let Some(intent) = Self::from_label(&normalized) {
            return intent;
        }
        let first_word = normalized
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())
            .unwrap_or("");
        if let Some(intent) = Self::from_label(first_word) {
            return intent;
        }
        Self::LABELS
            .iter()
            .find(|label| normalized.contains(*label))
            .and_then(|label| Self::from_label(label))
            .unwrap_or(Intent::General)
    }
}

/// Kind of evidence available to the symptom branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Evidence {
    HasImage,
    TextOnly,
}

/// Closed set of labels a router node can write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteLabel {
    Intent(Intent),
    Evidence(Evidence),
}

/// Names of the [`ConsultState`] fields, used in node contracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateField {
    AudioInput,
    ImageInput,
    QueryText,
    TranscribedText,
    ResponseText,
    ResponseAudio,
    RouteLabel,
    Location,
}

/// Record threaded through every node of one consultation.
///
/// Callers fill the inputs (`audio_input`, `image_input`, `query_text`, `location`); nodes
/// fill the rest. Each request gets its own instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultState {
    pub audio_input: Option<MediaHandle>,
    pub image_input: Option<MediaHandle>,
    pub query_text: Option<String>,
    pub transcribed_text: Option<String>,
    pub response_text: Option<String>,
    pub response_audio: Option<MediaHandle>,
    #[serde(skip)]
    pub route_label: Option<RouteLabel>,
    pub location: Option<GeoPoint>,
}

impl ConsultState {
    pub fn from_text(query: impl Into<String>) -> Self {
        Self {
            query_text: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_audio(mut self, audio: impl Into<MediaHandle>) -> Self {
        self.audio_input = Some(audio.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<MediaHandle>) -> Self {
        self.image_input = Some(image.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// The user's question: the transcript when non-blank, else the typed query, trimmed.
    pub fn query(&self) -> &str {
        [&self.transcribed_text, &self.query_text]
            .into_iter()
            .filter_map(|t| t.as_deref().map(str::trim))
            .find(|t| !t.is_empty())
            .unwrap_or("")
    }
}

/// Change to one optional field.
#[derive(Clone, Debug, PartialEq)]
pub enum Patch<T> {
    /// Leave the field as it is.
    Keep,
    Set(T),
    /// Explicitly empty the field.
    Clear,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// `Set` for `Some`, `Clear` for `None`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        }
    }

    fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Set(v) => *slot = Some(v),
            Patch::Clear => *slot = None,
        }
    }
}

impl<T: Clone + PartialEq> Patch<T> {
    fn between(before: &Option<T>, after: &Option<T>) -> Self {
        if before == after {
            Patch::Keep
        } else {
            Patch::from_option(after.clone())
        }
    }
}

/// Partial state returned by a node. `StateUpdate::default()` changes nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateUpdate {
    pub audio_input: Patch<MediaHandle>,
    pub image_input: Patch<MediaHandle>,
    pub query_text: Patch<String>,
    pub transcribed_text: Patch<String>,
    pub response_text: Patch<String>,
    pub response_audio: Patch<MediaHandle>,
    pub route_label: Patch<RouteLabel>,
    pub location: Patch<GeoPoint>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcribed_text(mut self, patch: Patch<String>) -> Self {
        self.transcribed_text = patch;
        self
    }

    pub fn response_text(mut self, text: impl Into<String>) -> Self {
        self.response_text = Patch::Set(text.into());
        self
    }

    pub fn response_audio(mut self, patch: Patch<MediaHandle>) -> Self {
        self.response_audio = patch;
        self
    }

    pub fn clear_image(mut self) -> Self {
        self.image_input = Patch::Clear;
        self
    }

    pub fn route(mut self, label: RouteLabel) -> Self {
        self.route_label = Patch::Set(label);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

const INPUT_FIELDS: [StateField; 4] = [
    StateField::AudioInput,
    StateField::ImageInput,
    StateField::QueryText,
    StateField::Location,
];

impl GraphState for ConsultState {
    type Update = StateUpdate;
    type Field = StateField;
    type Label = RouteLabel;

    const LABEL_FIELD: StateField = StateField::RouteLabel;

    fn input_fields() -> &'static [StateField] {
        &INPUT_FIELDS
    }

    fn merge(&mut self, update: StateUpdate) {
        update.audio_input.apply(&mut self.audio_input);
        update.image_input.apply(&mut self.image_input);
        update.query_text.apply(&mut self.query_text);
        update.transcribed_text.apply(&mut self.transcribed_text);
        update.response_text.apply(&mut self.response_text);
        update.response_audio.apply(&mut self.response_audio);
        update.route_label.apply(&mut self.route_label);
        update.location.apply(&mut self.location);
    }

    fn diff(&self, newer: &Self) -> StateUpdate {
        StateUpdate {
            audio_input: Patch::between(&self.audio_input, &newer.audio_input),
            image_input: Patch::between(&self.image_input, &newer.image_input),
            query_text: Patch::between(&self.query_text, &newer.query_text),
            transcribed_text: Patch::between(&self.transcribed_text, &newer.transcribed_text),
            response_text: Patch::between(&self.response_text, &newer.response_text),
            response_audio: Patch::between(&self.response_audio, &newer.response_audio),
            route_label: Patch::between(&self.route_label, &newer.route_label),
            location: Patch::between(&self.location, &newer.location),
        }
    }

    fn take_route_label(&mut self) -> Option<RouteLabel> {
        self.route_label.take()
    }
}
