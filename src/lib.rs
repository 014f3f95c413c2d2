//! pxcollide: pixel-stepped AABB collision world with trigger events and ray casting

pub mod types;
pub mod api;
pub mod geometry;
pub mod body;
pub mod world;
pub mod raytracer;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::body::{Body, Neighbors};
pub use crate::geometry::Geometry;
pub use crate::world::World;
pub use crate::raytracer::RayTracer;
