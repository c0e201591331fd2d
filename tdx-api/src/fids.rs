use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Fixed cap on upstream results per request.
const TOP_RESULTS: u32 = 30;

/// Which side of the FIDS board to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Arrive,
    Depart,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arrive => f.write_str("Arrive"),
            Self::Depart => f.write_str("Depart"),
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Arrive" => Ok(Self::Arrive),
            "Depart" => Ok(Self::Depart),
            _ => Err(DirectionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionParseError(String);

impl Display for DirectionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid direction '{}': expected Arrive or Depart", self.0)
    }
}

impl std::error::Error for DirectionParseError {}

/// One FIDS board lookup: a flight date, a direction and an airport code.
#[derive(Debug, Clone)]
pub struct FlightQuery {
    pub date: String,
    pub direction: Direction,
    pub airport: String,
}

impl FlightQuery {
    pub fn new(date: String, direction: Direction, airport: String) -> Self {
        Self {
            date,
            direction,
            airport,
        }
    }

    fn filter(&self) -> String {
        format!("date(FlightDate) eq {}", self.date)
    }
}

/// OData query-string parameters understood by the FIDS endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FidsQueryParams {
    #[serde(rename = "IsCargo")]
    is_cargo: bool,
    #[serde(rename = "$filter")]
    filter: String,
    #[serde(rename = "$top")]
    top: u32,
    #[serde(rename = "$format")]
    format: &'static str,
}

impl From<&FlightQuery> for FidsQueryParams {
    fn from(query: &FlightQuery) -> Self {
        Self {
            is_cargo: false,
            filter: query.filter(),
            top: TOP_RESULTS,
            format: "JSON",
        }
    }
}

/// A FIDS record as returned by the upstream API.
///
/// Only the fields the reduced views need are modelled; unknown fields are
/// ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FidsFlight {
    #[serde(rename = "FlightNumber")]
    pub flight_number: String,
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    #[serde(rename = "ScheduleDepartureTime")]
    pub schedule_departure_time: Option<String>,
    #[serde(rename = "EstimatedDepartureTime")]
    pub estimated_departure_time: Option<String>,
    #[serde(rename = "ScheduleArrivalTime")]
    pub schedule_arrival_time: Option<String>,
    #[serde(rename = "EstimatedArrivalTime")]
    pub estimated_arrival_time: Option<String>,
    #[serde(rename = "ArrivalAirportID")]
    pub arrival_airport_id: Option<String>,
    #[serde(rename = "DepartureAirportID")]
    pub departure_airport_id: Option<String>,
    #[serde(rename = "DepartureRemark")]
    pub departure_remark: Option<String>,
    #[serde(rename = "ArrivalRemark")]
    pub arrival_remark: Option<String>,
    #[serde(rename = "Terminal")]
    pub terminal: Option<String>,
}

/// Reduced view served for `Direction::Arrive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalFlight {
    #[serde(rename = "FlightNumber")]
    pub flight_number: String,
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    #[serde(rename = "ScheduleDepartureTime")]
    pub schedule_departure_time: Option<String>,
    #[serde(rename = "EstimatedDepartureTime")]
    pub estimated_departure_time: Option<String>,
    #[serde(rename = "ArrivalAirportID")]
    pub arrival_airport_id: Option<String>,
    #[serde(rename = "DepartureRemark")]
    pub departure_remark: Option<String>,
    #[serde(rename = "Terminal")]
    pub terminal: Option<String>,
}

impl From<&FidsFlight> for ArrivalFlight {
    fn from(flight: &FidsFlight) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            airline_id: flight.airline_id.clone(),
            schedule_departure_time: flight.schedule_departure_time.clone(),
            estimated_departure_time: flight.estimated_departure_time.clone(),
            arrival_airport_id: flight.arrival_airport_id.clone(),
            departure_remark: flight.departure_remark.clone(),
            terminal: flight.terminal.clone(),
        }
    }
}

/// Reduced view served for `Direction::Depart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureFlight {
    #[serde(rename = "FlightNumber")]
    pub flight_number: String,
    #[serde(rename = "AirlineID")]
    pub airline_id: String,
    #[serde(rename = "ScheduleArrivalTime")]
    pub schedule_arrival_time: Option<String>,
    #[serde(rename = "EstimatedArrivalTime")]
    pub estimated_arrival_time: Option<String>,
    #[serde(rename = "DepartureAirportID")]
    pub departure_airport_id: Option<String>,
    #[serde(rename = "ArrivalRemark")]
    pub arrival_remark: Option<String>,
    #[serde(rename = "Terminal")]
    pub terminal: Option<String>,
}

impl From<&FidsFlight> for DepartureFlight {
    fn from(flight: &FidsFlight) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            airline_id: flight.airline_id.clone(),
            schedule_arrival_time: flight.schedule_arrival_time.clone(),
            estimated_arrival_time: flight.estimated_arrival_time.clone(),
            departure_airport_id: flight.departure_airport_id.clone(),
            arrival_remark: flight.arrival_remark.clone(),
            terminal: flight.terminal.clone(),
        }
    }
}
