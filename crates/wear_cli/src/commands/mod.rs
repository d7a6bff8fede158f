pub mod schema;
pub mod tile;
