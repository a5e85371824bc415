use crate::error::{Result, TravelAgentError};
use crate::llm::tools::tool::{function_to_tool, required_str, LlmTool, ParamType, ToolDescriptor};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search.json";
const MAX_FLIGHTS: usize = 3;
const MAX_STOPS: u32 = 2;
const TIMEOUT_SECONDS: u64 = 30;

const FLIGHT_SEARCH_DOC: &str = "
    Searches for available flights between two locations using the Google Flights API via SerpAPI.

    Args:
        origin (str): Departure airport code
        destination (str): Arrival airport code
        departure_date (str): Outbound flight date in YYYY-MM-DD format
        return_date (str): Return flight date in YYYY-MM-DD format, optional for one-way flights

    Returns:
        str: Formatted string containing flight details including times, prices and layovers
";

const PARAMS: &[(&str, ParamType)] = &[
    ("origin", ParamType::String),
    ("destination", ParamType::String),
    ("departure_date", ParamType::String),
    ("return_date", ParamType::String),
];

#[derive(Debug, Clone, Deserialize)]
struct Airport {
    id: String,
    time: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FlightLeg {
    flight_number: String,
    departure_airport: Airport,
    arrival_airport: Airport,
    duration: i64,
    airline: String,
    airplane: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Layover {
    id: String,
    duration: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct FlightOption {
    flights: Vec<FlightLeg>,
    #[serde(default)]
    layovers: Vec<Layover>,
    total_duration: i64,
    price: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    error: Option<String>,
    #[serde(default)]
    best_flights: Vec<Value>,
}

impl SearchResponse {
    /// Decode the options that get shown; entries past those are never parsed
    fn top_flights(&self) -> Result<Vec<FlightOption>> {
        self.best_flights
            .iter()
            .take(MAX_FLIGHTS)
            .map(|option| Ok(serde_json::from_value(option.clone())?))
            .collect()
    }
}

/// Render a duration in minutes as "2 hr 5 min", "2 hr" or "5 min"
fn format_minutes(total_minutes: i64) -> Result<String> {
    if total_minutes < 0 {
        return Err(TravelAgentError::ToolError(
            "Total minutes must be a non-negative integer.".to_string(),
        ));
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    Ok(match (hours, minutes) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} hr", h),
        (h, m) => format!("{} hr {} min", h, m),
    })
}

fn format_leg(leg: &FlightLeg) -> Result<String> {
    Ok(format!(
        "{} {} - {} ({}) -> {} ({}) [{}] - {}",
        leg.airline,
        leg.flight_number,
        leg.departure_airport.id,
        leg.departure_airport.time,
        leg.arrival_airport.id,
        leg.arrival_airport.time,
        format_minutes(leg.duration)?,
        leg.airplane
    ))
}

fn format_price(price: &Value) -> String {
    match price {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_flights(flights: &[FlightOption]) -> Result<String> {
    let mut lines = Vec::new();
    for flight in flights {
        for leg in &flight.flights {
            lines.push(format_leg(leg)?);
        }
        if let Some(layover) = flight.layovers.first() {
            lines.push(format!("Layover at {}: {}", layover.id, format_minutes(layover.duration)?));
        }
        lines.push(format!("Total Duration: {}", format_minutes(flight.total_duration)?));
        lines.push(format!("Price (USD): ${}", format_price(&flight.price)));
        lines.push(String::new());
    }
    Ok(lines.join("\n"))
}

/// Tool for searching Google Flights through SerpAPI
///
/// Search failures are reported to the conversation as text rather than as errors, so
/// the user sees why no flights came back.
#[derive(Clone)]
pub struct FlightSearchTool {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl FlightSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_SERPAPI_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    fn query_params(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", "google_flights".to_string()),
            ("hl", "en".to_string()),
            ("departure_id", origin.to_string()),
            ("arrival_id", destination.to_string()),
            ("outbound_date", departure_date.to_string()),
            ("stops", MAX_STOPS.to_string()),
            ("currency", "USD".to_string()),
            ("api_key", self.api_key.clone().unwrap_or_default()),
        ];

        match return_date {
            Some(date) => {
                params.push(("return_date", date.to_string()));
                params.push(("type", "1".to_string()));
            }
            None => params.push(("type", "2".to_string())),
        }

        params
    }

    async fn search(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
    ) -> Result<String> {
        let params = self.query_params(origin, destination, departure_date, return_date);

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let results: SearchResponse = response.json().await?;

        if let Some(error) = results.error {
            return Ok(format!("Error searching flights: {}", error));
        }

        let best = results.top_flights()?;
        info!(origin, destination, found = results.best_flights.len(), "Flight search complete");

        Ok(format!(
            "Flights from {} to {}:\n\n{}",
            origin,
            destination,
            format_flights(&best)?
        ))
    }
}

#[async_trait]
impl LlmTool for FlightSearchTool {
    async fn run(&self, args: &HashMap<String, Value>, _correlation_id: &str) -> Result<String> {
        let origin = required_str(args, "origin")?;
        let destination = required_str(args, "destination")?;
        let departure_date = required_str(args, "departure_date")?;
        let return_date = args
            .get("return_date")
            .and_then(|v| v.as_str())
            .filter(|d| !d.trim().is_empty());

        match self.search(origin, destination, departure_date, return_date).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "Flight search failed");
                Ok(format!("Failed to search flights: {}", e))
            }
        }
    }

    fn descriptor(&self) -> ToolDescriptor {
        function_to_tool("flight_search", FLIGHT_SEARCH_DOC, PARAMS)
    }

    fn matches(&self, name: &str) -> bool {
        name == "flight_search"
    }
}
