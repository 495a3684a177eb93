pub mod directory;
pub mod doctor;

pub use directory::DoctorDirectory;
pub use doctor::DoctorService;
