use serde::Serialize;

/// A smart bin location shown on the map screen.
#[derive(Clone, Debug, Serialize)]
pub struct CollectionPoint {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const COLLECTION_POINTS: [CollectionPoint; 3] = [
    CollectionPoint {
        name: "Malecón 2000",
        lat: -2.1894,
        lon: -79.8891,
    },
    CollectionPoint {
        name: "Parque Samanes",
        lat: -2.1450,
        lon: -79.9000,
    },
    CollectionPoint {
        name: "ITSO (Campus)",
        lat: -2.1980,
        lon: -79.8950,
    },
];
