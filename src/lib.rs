//! route-planner core
//!
//! Orders delivery stops with the help of external geocoding and routing
//! providers: cached, paced geocoding; provider-sized matrix requests;
//! k-means partitioning when a route exceeds the provider's waypoint limit.

pub mod batch;
pub mod cache;
pub mod cluster;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod google;
pub mod haversine;
mod http;
pub mod matrix;
pub mod model;
pub mod normalize;
pub mod osrm;
pub mod retry;
pub mod sequencer;
pub mod solver;
pub mod traits;

pub use error::{GeocodeError, MatrixError, ProviderError, ProviderStatus, RouteError};
pub use model::{Coordinate, OptimizeOptions, OptimizedRoute, RouteStats, RouteWarning, Stop};
pub use solver::RoutePlanner;
