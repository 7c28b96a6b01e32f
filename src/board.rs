use std::collections::HashMap;
use std::fmt;

use log::debug;
use thiserror::Error;

use crate::map::{MapData, RouteRecord};
use crate::types::{CityId, RouteId, TrackColor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    /// Unordered pair, stored in import order.
    pub endpoints: (CityId, CityId),
    pub length: u32,
    pub color: TrackColor,
    pub tunnel: bool,
    pub ferries: u32,
}

impl Route {
    #[inline]
    pub fn connects(&self, city: CityId) -> bool {
        self.endpoints.0 == city || self.endpoints.1 == city
    }

    /// The endpoint opposite `city`, or None if the route does not touch it.
    #[inline]
    pub fn other_end(&self, city: CityId) -> Option<CityId> {
        if self.endpoints.0 == city {
            Some(self.endpoints.1)
        } else if self.endpoints.1 == city {
            Some(self.endpoints.0)
        } else {
            None
        }
    }

    /// Endpoint pair with the smaller id first; parallel routes share this key.
    #[inline]
    pub fn pair_key(&self) -> (CityId, CityId) {
        pair_key(self.endpoints.0, self.endpoints.1)
    }
}

#[inline]
fn pair_key(a: CityId, b: CityId) -> (CityId, CityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorKind {
    MalformedRecord,
    DuplicateCityCollision,
    InvalidLength,
    InvalidFerryCount,
    SelfLoop,
}

impl fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportErrorKind::MalformedRecord => "malformed record",
            ImportErrorKind::DuplicateCityCollision => "city name collides with an existing city",
            ImportErrorKind::InvalidLength => "length must be at least 1",
            ImportErrorKind::InvalidFerryCount => "ferry count must be between 0 and the route length",
            ImportErrorKind::SelfLoop => "route connects a city to itself",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("route #{route_index}: {kind}")]
pub struct ImportError {
    pub kind: ImportErrorKind,
    pub route_index: usize,
}

impl ImportError {
    #[inline]
    fn at(route_index: usize, kind: ImportErrorKind) -> Self {
        Self { kind, route_index }
    }
}

/// Immutable multigraph of cities and routes.
///
/// Cities and routes are addressed by dense ids (`0..n`). Every route id is
/// listed in the adjacency of both of its endpoints.
#[derive(Debug, Clone)]
pub struct BoardGraph {
    cities: Vec<City>,
    routes: Vec<Route>,
    adjacency: Vec<Vec<RouteId>>,
    name_to_id: HashMap<String, CityId>,
    pairs: HashMap<(CityId, CityId), Vec<RouteId>>,
}

/// Mutable state used only while a board is being imported.
#[derive(Default)]
struct Builder {
    cities: Vec<City>,
    routes: Vec<Route>,
    adjacency: Vec<Vec<RouteId>>,
    name_to_id: HashMap<String, CityId>,
    // ASCII-lowercased name -> id, to catch near-duplicate spellings
    folded: HashMap<String, CityId>,
    pairs: HashMap<(CityId, CityId), Vec<RouteId>>,
}

impl Builder {
    fn resolve_city(&mut self, raw: &str, idx: usize) -> Result<CityId, ImportError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ImportError::at(idx, ImportErrorKind::MalformedRecord));
        }
        if let Some(&id) = self.name_to_id.get(name) {
            return Ok(id);
        }
        if self.folded.contains_key(&name.to_ascii_lowercase()) {
            return Err(ImportError::at(idx, ImportErrorKind::DuplicateCityCollision));
        }
        let id = CityId::try_from(self.cities.len())
            .map_err(|_| ImportError::at(idx, ImportErrorKind::MalformedRecord))?;
        self.cities.push(City { id, name: name.to_string() });
        self.adjacency.push(Vec::new());
        self.name_to_id.insert(name.to_string(), id);
        self.folded.insert(name.to_ascii_lowercase(), id);
        Ok(id)
    }

    fn add_record(&mut self, rec: &RouteRecord, idx: usize) -> Result<(), ImportError> {
        let [a, b] = rec.endpoints.as_slice() else {
            return Err(ImportError::at(idx, ImportErrorKind::MalformedRecord));
        };
        let color = TrackColor::parse(&rec.color)
            .ok_or(ImportError::at(idx, ImportErrorKind::MalformedRecord))?;
        if rec.length < 1 {
            return Err(ImportError::at(idx, ImportErrorKind::InvalidLength));
        }
        let length = u32::try_from(rec.length)
            .map_err(|_| ImportError::at(idx, ImportErrorKind::InvalidLength))?;
        if rec.ferries > rec.length {
            return Err(ImportError::at(idx, ImportErrorKind::InvalidFerryCount));
        }
        let ferries = u32::try_from(rec.ferries)
            .map_err(|_| ImportError::at(idx, ImportErrorKind::InvalidFerryCount))?;

        let ca = self.resolve_city(a, idx)?;
        let cb = self.resolve_city(b, idx)?;
        if ca == cb {
            return Err(ImportError::at(idx, ImportErrorKind::SelfLoop));
        }

        let id = RouteId::try_from(self.routes.len())
            .map_err(|_| ImportError::at(idx, ImportErrorKind::MalformedRecord))?;
        self.routes.push(Route {
            id,
            endpoints: (ca, cb),
            length,
            color,
            tunnel: rec.tunnel,
            ferries,
        });
        self.adjacency[ca as usize].push(id);
        self.adjacency[cb as usize].push(id);
        self.pairs.entry(pair_key(ca, cb)).or_default().push(id);
        Ok(())
    }
}

impl BoardGraph {
    /// Import a map. Fails on the first invalid record; nothing is exposed on failure.
    pub fn build(map: &MapData) -> Result<BoardGraph, ImportError> {
        let mut b = Builder::default();
        for (idx, rec) in map.routes.iter().enumerate() {
            b.add_record(rec, idx)?;
        }
        debug!(
            "board import: {} cities, {} routes, {} endpoint pairs",
            b.cities.len(),
            b.routes.len(),
            b.pairs.len()
        );
        Ok(BoardGraph {
            cities: b.cities,
            routes: b.routes,
            adjacency: b.adjacency,
            name_to_id: b.name_to_id,
            pairs: b.pairs,
        })
    }

    #[inline]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    #[inline]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn city_by_id(&self, id: CityId) -> Option<&City> {
        self.cities.get(id as usize)
    }

    #[inline]
    pub fn city_by_name(&self, name: &str) -> Option<&City> {
        self.name_to_id
            .get(name.trim())
            .and_then(|&id| self.city_by_id(id))
    }

    #[inline]
    pub fn route_by_id(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id as usize)
    }

    #[inline]
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    #[inline]
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Routes directly joining `a` and `b`, in id order. Empty if not adjacent.
    pub fn routes_between(&self, a: CityId, b: CityId) -> Vec<&Route> {
        self.pairs
            .get(&pair_key(a, b))
            .map(|ids| ids.iter().map(|&id| &self.routes[id as usize]).collect())
            .unwrap_or_default()
    }

    /// Routes touching `city`, in import order.
    pub fn routes_at(&self, city: CityId) -> Vec<&Route> {
        self.route_ids_at(city)
            .iter()
            .map(|&id| &self.routes[id as usize])
            .collect()
    }

    #[inline]
    pub fn route_ids_at(&self, city: CityId) -> &[RouteId] {
        self.adjacency
            .get(city as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All routes sharing `route`'s endpoint pair, including itself.
    pub fn parallel_set_of(&self, route: RouteId) -> &[RouteId] {
        self.route_by_id(route)
            .and_then(|r| self.pairs.get(&r.pair_key()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn are_adjacent(&self, a: CityId, b: CityId) -> bool {
        self.pairs.contains_key(&pair_key(a, b))
    }

    /// Endpoint pairs served by two or more routes.
    pub fn parallel_sets(&self) -> impl Iterator<Item = &[RouteId]> {
        self.pairs
            .values()
            .filter(|ids| ids.len() > 1)
            .map(Vec::as_slice)
    }

    pub fn max_route_length(&self) -> u32 {
        self.routes.iter().map(|r| r.length).max().unwrap_or(0)
    }
}
