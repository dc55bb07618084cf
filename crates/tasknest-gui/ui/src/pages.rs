mod landing;
mod not_found;
mod tasks;

pub use landing::LandingPage;
pub use not_found::NotFoundPage;
pub use tasks::TasksPage;
