pub mod doctor;
pub mod loc;
pub mod trenchbroom;
