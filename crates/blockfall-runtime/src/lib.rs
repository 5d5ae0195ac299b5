//! Terminal event loop with fixed-timestep updates.
//!
//! [`Runtime::run`] drives an [`App`]: terminal events go to
//! [`App::handle_event`], whole tick periods of elapsed time become
//! [`App::update`] calls, and [`App::draw`] runs according to the
//! [`RenderMode`].

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime, timestep::FixedTimestep};

mod app;
mod event;
mod event_loop;
mod runtime;
mod timestep;
