pub mod arsenal;
pub mod batter;
pub mod lineups;
pub mod lookup;
pub mod tables;

pub use arsenal::fetch_pitch_arsenal;
pub use batter::fetch_batter_vs_pitch;
pub use lineups::fetch_lineups;
