//! Destination selection from a parking-availability feed.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// One monitored parking space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingSlot {
    #[serde(alias = "id")]
    pub slot_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_empty: bool,
}

impl ParkingSlot {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Snapshot of a parking lot as reported by the availability service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParkingFeed {
    pub date_time: String,
    pub parking: String,
    #[serde(default)]
    pub slots: Vec<ParkingSlot>,
}

impl ParkingFeed {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Picks the slot to navigate to.
pub trait SlotPolicy {
    fn choose<'a>(&self, feed: &'a ParkingFeed, origin: Option<&Coordinate>) -> Option<&'a ParkingSlot>;
}

/// The first empty slot in feed order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl SlotPolicy for FirstCandidate {
    fn choose<'a>(&self, feed: &'a ParkingFeed, _origin: Option<&Coordinate>) -> Option<&'a ParkingSlot> {
        feed.slots.iter().find(|slot| slot.is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "date_time": "2023-06-01 18:29:47",
        "parking": "Central Parking II",
        "slots": [
            {"id": "a1", "latitude": 34.4181, "longitude": -119.8571, "is_empty": false},
            {"id": "b2", "latitude": 34.4182, "longitude": -119.8572, "is_empty": true},
            {"id": "c3", "latitude": 34.4183, "longitude": -119.8573, "is_empty": true}
        ]
    }"#;

    #[test]
    fn parses_service_payload() {
        let feed = ParkingFeed::from_json(FEED).unwrap();
        assert_eq!(feed.parking, "Central Parking II");
        assert_eq!(feed.slots.len(), 3);
        assert_eq!(feed.slots[0].slot_id, "a1");
    }

    #[test]
    fn first_candidate_skips_occupied_slots() {
        let feed = ParkingFeed::from_json(FEED).unwrap();
        let slot = FirstCandidate.choose(&feed, None).unwrap();
        assert_eq!(slot.slot_id, "b2");
        assert_eq!(slot.coordinate(), Coordinate::new(34.4182, -119.8572));
    }

    #[test]
    fn full_lot_has_no_candidate() {
        let mut feed = ParkingFeed::from_json(FEED).unwrap();
        for slot in &mut feed.slots {
            slot.is_empty = false;
        }
        assert!(FirstCandidate.choose(&feed, None).is_none());
    }
}
