pub mod camera;
pub mod entity;
pub mod geom;
pub mod physics;
pub mod tile;
pub mod tilemap;
