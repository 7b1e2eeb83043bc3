// handlers/mod.rs - Route handlers
//
// Each handler makes exactly one gateway call and owns its failure policy:
// listing masks failures as an empty list, upload reports a generic 500,
// landing treats failure as "signed out".

pub mod drivers;  // GET  /api/drivers
pub mod health;   // GET  /health
pub mod landing;  // GET  /
pub mod upload;   // POST /api/upload

pub use drivers::list as drivers_list;
pub use health::health;
pub use landing::landing;
pub use upload::upload;
