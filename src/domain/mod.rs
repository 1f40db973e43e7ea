pub mod control;
pub mod entity;
pub mod geom;
pub mod obstacle;
pub mod random;
pub mod sprite;
pub mod timing;
pub mod wander;
