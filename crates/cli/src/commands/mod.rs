pub mod collaborate;
pub mod doctor;
pub mod models;
pub mod onboard;
