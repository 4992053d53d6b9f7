/// Geographic position of a known city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Static table of supported cities, keyed by normalized name.
///
/// Insertion order is kept so greetings list cities the same way every time.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    entries: Vec<(String, Coordinates)>,
}

const DEFAULT_CITIES: &[(&str, f64, f64)] = &[
    ("москва", 55.75, 37.61),
    ("санкт-петербург", 59.93, 30.31),
    ("братск", 56.15, 101.63),
    ("киев", 50.45, 30.52),
    ("минск", 53.90, 27.56),
    ("новосибирск", 55.03, 82.92),
];

impl CityRegistry {
    /// Build a registry from `(name, latitude, longitude)` triples.
    ///
    /// Names are normalized on the way in; a later duplicate is ignored.
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: AsRef<str>,
    {
        let mut entries: Vec<(String, Coordinates)> = Vec::new();
        for (name, latitude, longitude) in cities {
            let key = normalize_city(name.as_ref());
            if entries.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            entries.push((
                key,
                Coordinates {
                    latitude,
                    longitude,
                },
            ));
        }
        Self { entries }
    }

    /// Look a city up by user-supplied name (case and surrounding whitespace ignored).
    pub fn lookup(&self, name: &str) -> Option<Coordinates> {
        let key = normalize_city(name);
        self.entries
            .iter()
            .find(|(city, _)| *city == key)
            .map(|(_, coords)| *coords)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CITIES.iter().map(|&(name, lat, lon)| (name, lat, lon)))
    }
}

/// Trim and case-fold a city name the way registry keys are stored.
pub fn normalize_city(name: &str) -> String {
    name.trim().to_lowercase()
}
