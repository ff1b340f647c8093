//! Map projection of canonical routes.
//!
//! Reduces a [`Route`] to what a map view draws: stop markers, one line per
//! segment, a center point and a fare label. Stops at `(0, 0)` have no known
//! position and are never plotted.

use serde::Serialize;

use crate::domain::{FareRange, Route, Stop, VehicleType};

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    fn of(stop: &Stop) -> Option<Self> {
        stop.has_position().then_some(LatLng {
            lat: stop.latitude,
            lng: stop.longitude,
        })
    }
}

/// What a marker stands for along the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Origin,
    Transfer,
    Destination,
}

/// A labelled stop on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub name: String,
    pub position: LatLng,
}

/// The line drawn for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub vehicle_type: VehicleType,
    pub path: Vec<LatLng>,
}

/// Everything a map needs to show one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Mean of the marker positions; `None` when no stop has a position.
    pub center: Option<LatLng>,
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
    pub fare_label: String,
}

/// Project a route onto a map view.
///
/// ```
/// use commute_server::domain::{Route, Segment, Stop, VehicleType};
/// use commute_server::projection::project_route;
///
/// let route = Route {
///     segments: vec![Segment {
///         vehicle_type: VehicleType::Keke,
///         from_stop: Stop::at("Berger", 9.07, 7.48),
///         to_stop: Stop::at("Wuse Market", 9.06, 7.47),
///         cost: 200.0,
///         ..Segment::default()
///     }],
///     ..Route::default()
/// };
///
/// let view = project_route(&route);
/// assert_eq!(view.markers.len(), 2);
/// assert_eq!(view.polylines.len(), 1);
/// assert_eq!(view.fare_label, "₦200");
/// ```
pub fn project_route(route: &Route) -> MapView {
    let markers = markers(route);
    let center = center_of(&markers);

    let polylines = route
        .segments
        .iter()
        .filter_map(|segment| {
            let from = LatLng::of(&segment.from_stop)?;
            let to = LatLng::of(&segment.to_stop)?;
            Some(Polyline {
                vehicle_type: segment.vehicle_type,
                path: vec![from, to],
            })
        })
        .collect();

    MapView {
        center,
        markers,
        polylines,
        fare_label: fare_label(route),
    }
}

fn markers(route: &Route) -> Vec<Marker> {
    let stops = route
        .segments
        .iter()
        .map(|s| &s.from_stop)
        .chain(route.segments.last().map(|s| &s.to_stop));

    let mut markers: Vec<Marker> = Vec::new();
    for stop in stops {
        let Some(position) = LatLng::of(stop) else {
            continue;
        };
        if markers.last().is_some_and(|m| m.position == position) {
            continue;
        }
        markers.push(Marker {
            kind: MarkerKind::Transfer,
            name: stop.name.clone(),
            position,
        });
    }

    let last = markers.len().saturating_sub(1);
    for (i, marker) in markers.iter_mut().enumerate() {
        if i == 0 {
            marker.kind = MarkerKind::Origin;
        } else if i == last {
            marker.kind = MarkerKind::Destination;
        }
    }

    markers
}

fn center_of(markers: &[Marker]) -> Option<LatLng> {
    if markers.is_empty() {
        return None;
    }

    let n = markers.len() as f64;
    Some(LatLng {
        lat: markers.iter().map(|m| m.position.lat).sum::<f64>() / n,
        lng: markers.iter().map(|m| m.position.lng).sum::<f64>() / n,
    })
}

/// `"₦min–₦max"` when any segment quotes a range, else the total fare, else
/// `"Free"`.
fn fare_label(route: &Route) -> String {
    if route.segments.iter().any(|s| s.fare_range.is_some()) {
        let (min, max) = route
            .segments
            .iter()
            .map(|s| s.fare_range.unwrap_or(FareRange::new(s.cost, s.cost)))
            .fold((0.0, 0.0), |(min, max), r| (min + r.min, max + r.max));

        if min != max {
            return format!("₦{min:.0}–₦{max:.0}");
        }
        return naira(max);
    }

    let total = if route.total_cost > 0.0 {
        route.total_cost
    } else {
        route.segment_cost()
    };
    naira(total)
}

fn naira(amount: f64) -> String {
    if amount > 0.0 {
        format!("₦{amount:.0}")
    } else {
        "Free".to_string()
    }
}
