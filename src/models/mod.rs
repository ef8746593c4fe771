pub mod annotation;
pub mod appointment;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod turn;
pub mod user;

pub use annotation::*;
pub use appointment::*;
pub use doctor::*;
pub use enums::*;
pub use patient::*;
pub use turn::*;
pub use user::*;
