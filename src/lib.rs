pub mod collision;
pub mod compute;
pub mod config;
pub mod countdown;
pub mod damage;
pub mod entities;
pub mod error;
pub mod level;
pub mod people;
pub mod powerups;
pub mod scores;
pub mod scroll;
pub mod spawn;
pub mod trip;
pub mod vehicles;
pub mod weather;
