use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use crate::consult::messages::{HOSPITALS_APOLOGY, MISSING_LOCATION, NO_HOSPITALS};
use crate::consult::state::{ConsultState, StateField, StateUpdate};
use crate::error::AgentError;
use crate::graph::{Next, Node, NodeContract};
use crate::web::{Place, PlacesSearch};

/// Places listed in one answer.
pub const MAX_PLACES: usize = 5;

/// Lists hospitals near the caller's location for the treatment they asked about.
pub struct HospitalLookupNode {
    places: Arc<dyn PlacesSearch>,
}

impl HospitalLookupNode {
    pub const ID: &'static str = "hospitals";

    pub fn new(places: Arc<dyn PlacesSearch>) -> Self {
        Self { places }
    }
}

fn format_places(places: &[Place]) -> String {
    let mut text = String::from("Here are some hospitals near you:\n");
    for place in places.iter().take(MAX_PLACES) {
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
        let _ = write!(
            text,
            "\n{}\nAddress: {}\nPhone: {}\nWebsite: {}\n",
            place.title,
            or_na(&place.address),
            or_na(&place.phone),
            or_na(&place.website),
        );
    }
    text
}

#[async_trait]
impl Node<ConsultState> for HospitalLookupNode {
    fn id(&self) -> &str {
        Self::ID
    }

    fn contract(&self) -> NodeContract<StateField> {
        NodeContract::new()
            .reads([StateField::Location, StateField::TranscribedText])
            .writes([StateField::ResponseText])
    }

    async fn run(&self, state: &ConsultState) -> Result<(StateUpdate, Next), AgentError> {
        let Some(location) = state.location else {
            return Ok((StateUpdate::new().response_text(MISSING_LOCATION), Next::End));
        };
        let text = match self.places.nearby(state.query(), location).await {
            Ok(places) if places.is_empty() => NO_HOSPITALS.to_string(),
            Ok(places) => format_places(&places),
            Err(error) => {
                tracing::warn!(%error, "places lookup failed");
                HOSPITALS_APOLOGY.to_string()
            }
        };
        Ok((StateUpdate::new().response_text(text), Next::Continue))
    }
}
