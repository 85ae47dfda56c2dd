pub mod admission;

pub use admission::BookingAdmission;
