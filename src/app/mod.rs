//! The web application: route table plus its single page

pub mod home;
pub mod router;

use once_cell::sync::Lazy;

pub use home::GREETING;
pub use router::{Application, ApplicationBuilder, Handler};

static APPLICATION: Lazy<Application> = Lazy::new(build_application);

/// Route table for this deployment.
#[must_use]
pub fn build_application() -> Application {
    Application::builder().register("GET", "/", home::home).build()
}

/// Process-wide application, built on first use and shared by every
/// invocation afterwards.
#[must_use]
pub fn application() -> &'static Application {
    &APPLICATION
}
